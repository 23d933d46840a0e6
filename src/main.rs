use iced::widget::image::Handle;
use iced::widget::{button, canvas, column, container, row, stack, text, text_input, Image};
use iced::{Alignment, Element, Length, Task, Theme};
use log::{info, warn};
use rfd::FileDialog;

mod error;
mod media;
mod state;
mod ui;

#[cfg(test)]
mod test_utils;

use error::Error;
use media::reveal::reveal_in_file_browser;
use state::data::{EntryId, Library, LoadMode};
use state::library::load_library;
use state::session::{GridCell, LoadTicket, Session};
use state::settings::Settings;
use ui::canvas::ViewportInput;
use ui::grid::GridAction;

/// Main application state
struct PhotoArchive {
    /// Library, filter, pagination, thumbnails and viewer
    session: Session,
    settings: Settings,
    /// Text in the date filter box (applied on submit)
    filter_input: String,
    /// Thumbnails for the current page
    cells: Vec<GridCell>,
    /// Composed viewer frame, present while the viewer is open
    viewer_frame: Option<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// "Open Archive": dated photos only, sorted by capture date
    OpenArchive,
    /// "Open Folder": every image, in folder order
    OpenFolder,
    /// Background load finished
    LoadComplete(LoadTicket, Result<Library, Error>),
    FilterInputChanged(String),
    ApplyFilter,
    ResetFilter,
    SetGridColumns(usize),
    SetPageSize(usize),
    NextPage,
    PrevPage,
    /// A grid cell was clicked
    Grid(GridAction, EntryId),
    Viewer(ViewerMessage),
}

/// Messages for the open viewer
#[derive(Debug, Clone)]
pub enum ViewerMessage {
    Zoom(f64),
    Rotate(f32),
    Pan(f32, f32),
    /// Show the open file in the system file browser
    Reveal,
    Close,
}

impl PhotoArchive {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        info!("🎨 Photo Archive Viewer initialized with {:?}", settings);

        (
            PhotoArchive {
                session: Session::new(&settings),
                settings,
                filter_input: String::new(),
                cells: Vec::new(),
                viewer_frame: None,
                status: "Ready. Open an archive or a folder.".to_string(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenArchive => self.pick_and_load(LoadMode::Archive),
            Message::OpenFolder => self.pick_and_load(LoadMode::Folder),
            Message::LoadComplete(ticket, result) => {
                match self.session.finish_load(ticket, result) {
                    Ok(true) => {
                        let library = self.session.library();
                        let folder = self
                            .session
                            .directory()
                            .map(|dir| dir.display().to_string())
                            .unwrap_or_default();
                        self.status = match self.session.mode() {
                            Some(LoadMode::Archive) => format!(
                                "✅ Loaded {} photos from {}, {} without a capture date skipped.",
                                library.len(),
                                folder,
                                library.skipped()
                            ),
                            _ => format!("✅ Loaded {} photos from {}.", library.len(), folder),
                        };
                        self.filter_input.clear();
                        self.refresh_page();
                    }
                    // A newer load is still running
                    Ok(false) => {}
                    Err(e) => {
                        warn!("⚠️  Load failed: {}", e);
                        self.status = format!("⚠️  {}", e);
                    }
                }
                Task::none()
            }
            Message::FilterInputChanged(input) => {
                self.filter_input = input;
                Task::none()
            }
            Message::ApplyFilter => {
                match self.session.set_date_filter(&self.filter_input) {
                    Ok(()) => self.refresh_page(),
                    Err(e) => self.status = format!("⚠️  {}", e),
                }
                Task::none()
            }
            Message::ResetFilter => {
                self.filter_input.clear();
                self.session.clear_date_filter();
                self.refresh_page();
                Task::none()
            }
            Message::SetGridColumns(columns) => {
                self.session.set_grid_columns(columns);
                self.refresh_page();
                Task::none()
            }
            Message::SetPageSize(page_size) => {
                self.session.set_page_size(page_size);
                self.refresh_page();
                Task::none()
            }
            Message::NextPage => {
                if self.session.next_page() {
                    self.refresh_page();
                }
                Task::none()
            }
            Message::PrevPage => {
                if self.session.prev_page() {
                    self.refresh_page();
                }
                Task::none()
            }
            Message::Grid(action, id) => {
                self.dispatch_grid(action, id);
                Task::none()
            }
            Message::Viewer(message) => {
                self.update_viewer(message);
                Task::none()
            }
        }
    }

    /// Show the native folder picker and start a background load
    fn pick_and_load(&mut self, mode: LoadMode) -> Task<Message> {
        let title = match mode {
            LoadMode::Archive => "Select Photo Archive Folder",
            LoadMode::Folder => "Select Photo Folder",
        };

        let Some(folder_path) = FileDialog::new().set_title(title).pick_folder() else {
            return Task::none();
        };

        self.status = "Loading photos...".to_string();
        let ticket = self.session.begin_load(folder_path.clone(), mode);

        // The completion message is the only hand-off back to this thread
        Task::perform(load_library(folder_path, mode), move |result| {
            Message::LoadComplete(ticket, result)
        })
    }

    /// Route a grid cell action
    fn dispatch_grid(&mut self, action: GridAction, id: EntryId) {
        match action {
            GridAction::Open => match self.session.open_viewer(id) {
                Ok(_) => self.refresh_viewer(),
                Err(e) => self.status = format!("⚠️  {}", e),
            },
            GridAction::Reveal => {
                let result = self
                    .session
                    .entry_path(id)
                    .and_then(|path| reveal_in_file_browser(&path));
                if let Err(e) = result {
                    self.status = format!("⚠️  {}", e);
                }
            }
        }
    }

    fn update_viewer(&mut self, message: ViewerMessage) {
        if let ViewerMessage::Close = message {
            self.session.close_viewer();
            self.viewer_frame = None;
            return;
        }

        let Some(viewer) = self.session.viewer_mut() else {
            return;
        };
        match message {
            ViewerMessage::Reveal => {
                if let Err(e) = reveal_in_file_browser(viewer.path()) {
                    self.status = format!("⚠️  {}", e);
                }
                return;
            }
            ViewerMessage::Zoom(factor) => {
                viewer.zoom(factor);
            }
            ViewerMessage::Rotate(angle) => viewer.rotate(angle),
            ViewerMessage::Pan(dx, dy) => viewer.pan(dx, dy),
            ViewerMessage::Reveal | ViewerMessage::Close => {}
        }
        self.refresh_viewer();
    }

    /// Re-render the thumbnails of the current page
    fn refresh_page(&mut self) {
        self.cells = self.session.render_page();
    }

    /// Re-compose the viewer frame after a viewer change
    fn refresh_viewer(&mut self) {
        self.viewer_frame = self.session.viewer().map(|viewer| {
            let frame = viewer.compose();
            let (width, height) = frame.dimensions();
            Handle::from_rgba(width, height, frame.into_raw())
        });
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match (self.session.viewer(), &self.viewer_frame) {
            (Some(viewer), Some(frame)) => self.viewer_view(viewer, frame),
            _ => self.browser_view(),
        }
    }

    fn browser_view(&self) -> Element<Message> {
        let columns = self.session.grid_columns();
        let page_size = self.session.page_size();

        let file_controls = row![
            button("Open Archive").on_press(Message::OpenArchive).padding(8),
            button("Open Folder").on_press(Message::OpenFolder).padding(8),
        ]
        .spacing(10);

        let filter_controls = row![
            text("Filter Date (YYYY-MM-DD):"),
            text_input("YYYY-MM-DD", &self.filter_input)
                .on_input(Message::FilterInputChanged)
                .on_submit(Message::ApplyFilter)
                .width(Length::Fixed(120.0)),
            button("Filter by Date").on_press(Message::ApplyFilter),
            button("Reset Filter").on_press(Message::ResetFilter),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let layout_controls = row![
            text(format!("Grid Columns: {}", columns)),
            button("-").on_press(Message::SetGridColumns(columns.saturating_sub(1))),
            button("+").on_press(Message::SetGridColumns(columns + 1)),
            text(format!("Photos per page: {}", page_size)),
            button("-").on_press(Message::SetPageSize(page_size.saturating_sub(1))),
            button("+").on_press(Message::SetPageSize(page_size + 1)),
            text(format!(
                "Page: {} / {}",
                self.session.current_page(),
                self.session.total_pages()
            )),
            text(match self.session.filter().date() {
                Some(date) => format!("Showing {}", date.format("%Y-%m-%d")),
                None => String::new(),
            }),
            button("Previous").on_press(Message::PrevPage),
            button("Next").on_press(Message::NextPage),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let body: Element<Message> = if self.session.is_loading() && self.session.library().is_empty() {
            text("Loading photos...").into()
        } else if self.session.library().is_empty() {
            text("No photos found in the archive.").into()
        } else if self.cells.is_empty() {
            text("No photos to show on this page.").into()
        } else {
            ui::grid::view(&self.cells, columns)
        };

        column![
            file_controls,
            filter_controls,
            layout_controls,
            container(body).width(Length::Fill).height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(10)
        .padding(10)
        .into()
    }

    fn viewer_view<'a>(&'a self, viewer: &'a media::viewport::Viewport, frame: &Handle) -> Element<'a, Message> {
        let size = viewer.window_size();
        let width = Length::Fixed(size.x as f32);
        let height = Length::Fixed(size.y as f32);

        let base = viewer.base_size();
        let header = row![
            text(viewer.filename()).size(18),
            text(format!("{}x{}", base.x, base.y)),
            text(format!("{}%", viewer.zoom_percent())),
            button("Show in Folder").on_press(Message::Viewer(ViewerMessage::Reveal)),
            button("Close").on_press(Message::Viewer(ViewerMessage::Close)),
        ]
        .spacing(15)
        .align_y(Alignment::Center);

        let frame = stack![
            Image::new(frame.clone()).width(width).height(height),
            canvas(ViewportInput {
                zoom_step: self.settings.zoom_step,
            })
            .width(width)
            .height(height),
        ];

        container(
            column![header, frame, text(&self.status).size(14)]
                .spacing(10)
                .align_x(Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application(
        "Photo Archive Viewer",
        PhotoArchive::update,
        PhotoArchive::view,
    )
    .theme(PhotoArchive::theme)
    .centered()
    .run_with(PhotoArchive::new)
}
