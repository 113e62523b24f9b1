use crate::consts;
use ratatui::layout::{Flex, Layout, Rect, Size};

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    let [display] = Layout::horizontal([consts::DISPLAY_SIZE.width])
        .flex(Flex::Center)
        .areas(buffer_area);
    let [display] = Layout::vertical([consts::DISPLAY_SIZE.height])
        .flex(Flex::Center)
        .areas(display);
    display
}

/// Return a rectangle of the given size centered in `area`, shrunk to fit if
/// necessary.  When the leftover space is odd, the extra cell goes below and
/// to the right.
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let width = size.width.min(area.width);
    let height = size.height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rect::new(0, 1, 80, 21), Size::new(12, 12), Rect::new(34, 5, 12, 12))]
    #[case(Rect::new(0, 0, 80, 24), Size::new(80, 24), Rect::new(0, 0, 80, 24))]
    #[case(Rect::new(5, 7, 20, 10), Size::new(3, 3), Rect::new(13, 10, 3, 3))]
    #[case(Rect::new(5, 7, 20, 10), Size::new(30, 4), Rect::new(5, 10, 20, 4))]
    #[case(Rect::ZERO, Size::new(3, 3), Rect::ZERO)]
    fn test_center_rect(#[case] area: Rect, #[case] size: Size, #[case] r: Rect) {
        assert_eq!(center_rect(area, size), r);
    }
}
