use iced::widget::{container, mouse_area, scrollable, text, Column, Image, Row};
use iced::{Alignment, Element, Length};

use crate::media::thumbnail::THUMBNAIL_SIZE;
use crate::state::session::GridCell;
use crate::Message;

/// What a click on a grid cell asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    /// Left click: open the full-resolution viewer
    Open,
    /// Right click: show the file in the platform file browser
    Reveal,
}

/// Thumbnail grid for one page. Every cell reports `(action, entry id)`.
pub fn view(cells: &[GridCell], columns: usize) -> Element<'_, Message> {
    let rows = cells.chunks(columns.max(1)).map(|chunk| {
        Row::with_children(chunk.iter().map(cell))
            .spacing(10)
            .into()
    });

    scrollable(Column::with_children(rows).spacing(10).padding(10))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn cell(cell: &GridCell) -> Element<'_, Message> {
    let side = THUMBNAIL_SIZE as f32;
    let content = Column::new()
        .push(
            container(
                Image::new(cell.thumbnail.handle.clone())
                    .width(Length::Fixed(cell.thumbnail.width as f32))
                    .height(Length::Fixed(cell.thumbnail.height as f32)),
            )
            .center_x(Length::Fixed(side))
            .center_y(Length::Fixed(side)),
        )
        .push(text(&cell.filename).size(12))
        .push(text(&cell.caption).size(10))
        .spacing(4)
        .align_x(Alignment::Center);

    mouse_area(container(content).padding(5))
        .on_press(Message::Grid(GridAction::Open, cell.id))
        .on_right_press(Message::Grid(GridAction::Reveal, cell.id))
        .into()
}
