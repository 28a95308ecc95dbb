use iced::widget::{button, column, container, horizontal_space, pick_list, row, text, text_input};
use iced::{time, Alignment, Element, Length, Size, Subscription, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

mod catalog;
mod error;
mod settings;
mod signal;
mod state;
mod ui;

use catalog::Catalog;
use error::TrackerError;
use settings::{Settings, ThemeChoice};
use state::filter::{FilterSpec, SortKey, UsageFilter};
use state::session::{parse_selection, AutoSave, Session, HISTORY_PANEL_LIMIT};
use ui::Choice;

/// Main application state
struct Tracker {
    settings: Settings,
    /// `None` until the catalog has loaded
    session: Option<Session>,
    filter: FilterSpec,
    /// Contents of the move picker
    picker: String,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Background catalog load finished (startup or reload)
    CatalogLoaded(Result<Arc<Catalog>, String>),
    ReloadCatalog,

    SearchChanged(String),
    KindSelected(Choice),
    CategorySelected(Choice),
    UsageSelected(UsageFilter),
    SortBy(SortKey),
    /// A table row was clicked
    RowSelected(u32),

    PickerChanged(String),
    PickerChosen(String),
    UseSelected,

    NewChallenge,
    OpenChallenge,
    Save,
    SaveAs,
    ResetAll,
    AutoSaveTick,
}

impl Tracker {
    /// Create the application and start loading the catalog
    fn new(settings: Settings) -> (Self, Task<Message>) {
        let load = load_catalog_task(settings.challenge.catalog_path.clone());
        (
            Tracker {
                settings,
                session: None,
                filter: FilterSpec::default(),
                picker: String::new(),
                status: "Loading move catalog...".to_string(),
            },
            load,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CatalogLoaded(Ok(catalog)) => {
                let count = catalog.len();
                match self.session.as_mut() {
                    Some(session) => session.replace_catalog(catalog),
                    None => self.session = Some(Session::new(catalog, &self.settings.challenge)),
                }
                self.status = format!("Ready. {} moves in catalog.", count);
            }
            Message::CatalogLoaded(Err(e)) => {
                error!("Catalog load failed: {}", e);
                self.status = format!("Could not load the move catalog: {}", e);
                alert(MessageLevel::Error, "Catalog error", &e);
            }
            Message::ReloadCatalog => {
                self.status = "Reloading move catalog...".to_string();
                return load_catalog_task(self.settings.challenge.catalog_path.clone());
            }

            Message::SearchChanged(search) => self.filter.search = search,
            Message::KindSelected(choice) => self.filter.kind = choice.into_filter(),
            Message::CategorySelected(choice) => self.filter.category = choice.into_filter(),
            Message::UsageSelected(usage) => self.filter.usage = usage,
            Message::SortBy(key) => self.filter.toggle_sort(key),
            Message::RowSelected(id) => {
                if let Some(label) = self.session.as_ref().and_then(|s| s.pick(id)) {
                    self.picker = label;
                }
            }

            Message::PickerChanged(query) => self.picker = query,
            Message::PickerChosen(label) => self.picker = label,
            Message::UseSelected => self.use_selected(),

            Message::NewChallenge => {
                if let Some(session) = self.session.as_mut() {
                    if confirm("New challenge", "Current progress will be cleared. Continue?") {
                        session.new_challenge();
                        self.picker.clear();
                        self.status = "Started a new challenge.".to_string();
                    }
                }
            }
            Message::ResetAll => {
                if let Some(session) = self.session.as_mut() {
                    if confirm("Reset", "Mark every move as unused?") {
                        session.reset_all();
                        self.picker.clear();
                        self.status = "All moves reset.".to_string();
                    }
                }
            }
            Message::OpenChallenge => self.open_challenge(),
            Message::Save => self.save(),
            Message::SaveAs => self.save_as(),
            Message::AutoSaveTick => self.auto_save(),
        }

        Task::none()
    }

    fn use_selected(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if self.picker.trim().is_empty() {
            alert(MessageLevel::Warning, "No move selected", "Pick a move to use first.");
            return;
        }

        match parse_selection(&self.picker).and_then(|id| session.use_move(id)) {
            Ok(report) => {
                let mut status = format!("Used #{} {}.", report.id, report.name);
                if let Some(e) = report.signal_error {
                    status.push_str(&format!(" Signal not sent: {}", e));
                }
                match report.auto_save {
                    AutoSave::Saved(path) => status.push_str(&format!(" Saved to {}.", file_label(&path))),
                    AutoSave::Failed(e) => status.push_str(&format!(" Auto-save failed: {}", e)),
                    AutoSave::Skipped => {}
                }
                self.picker.clear();
                self.status = status;
            }
            Err(e) if e.is_warning() => {
                warn!("{}", e);
                alert(MessageLevel::Warning, "Warning", &e.to_string());
            }
            Err(e) => report_error("Could not use move", &e),
        }
    }

    fn open_challenge(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let file = FileDialog::new()
            .set_title("Open challenge")
            .add_filter("JSON files", &["json"])
            .add_filter("All files", &["*"])
            .set_directory(session.saves_dir())
            .pick_file();

        if let Some(path) = file {
            match session.load(&path) {
                Ok(()) => {
                    self.picker.clear();
                    self.status = format!("Loaded {} ({}).", file_label(&path), session.progress());
                }
                Err(e) => report_error("Could not open challenge", &e),
            }
        }
    }

    fn save(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        match session.save() {
            Ok(Some(path)) => self.status = format!("Saved to {}.", file_label(&path)),
            Ok(None) => self.save_as(),
            Err(e) => report_error("Could not save challenge", &e),
        }
    }

    fn save_as(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let dir = session.saves_dir().to_path_buf();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!("Could not create {}: {}", dir.display(), e);
        }

        let file = FileDialog::new()
            .set_title("Save challenge")
            .add_filter("JSON files", &["json"])
            .set_directory(&dir)
            .set_file_name("challenge.json")
            .save_file();

        if let Some(path) = file {
            match session.save_as(&path) {
                Ok(()) => self.status = format!("Saved to {}.", file_label(&path)),
                Err(e) => report_error("Could not save challenge", &e),
            }
        }
    }

    fn auto_save(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        match session.save() {
            Ok(Some(path)) => {
                info!("Periodic auto-save to {}", path.display());
                self.status = format!("Auto-saved to {}.", file_label(&path));
            }
            Ok(None) => self.status = "Progress is not saved yet. Use Save As to keep it.".to_string(),
            Err(e) => {
                warn!("Periodic auto-save failed: {}", e);
                self.status = format!("Auto-save failed: {}", e);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let toolbar = row![
            button("New").on_press(Message::NewChallenge),
            button("Open").on_press(Message::OpenChallenge),
            button("Save").on_press(Message::Save),
            button("Save As").on_press(Message::SaveAs),
            horizontal_space(),
            button("Reload catalog").on_press(Message::ReloadCatalog),
            button("Reset all").on_press(Message::ResetAll).style(button::danger),
        ]
        .spacing(6);

        let Some(session) = self.session.as_ref() else {
            return container(column![toolbar, text(&self.status).size(16)].spacing(20))
                .padding(10)
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        };

        let catalog = session.catalog();
        let filters = row![
            text("Search:"),
            text_input("Move name", &self.filter.search)
                .on_input(Message::SearchChanged)
                .width(Length::Fixed(160.0)),
            text("Type:"),
            pick_list(
                Choice::options(catalog.kinds()),
                Some(Choice::from_filter(&self.filter.kind)),
                Message::KindSelected,
            ),
            text("Status:"),
            pick_list(UsageFilter::ALL, Some(self.filter.usage), Message::UsageSelected),
            text("Category:"),
            pick_list(
                Choice::options(catalog.categories()),
                Some(Choice::from_filter(&self.filter.category)),
                Message::CategorySelected,
            ),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let rows = session.view(&self.filter);
        let history = session.recent_history(HISTORY_PANEL_LIMIT);
        let side_panel = column![
            ui::picker::view(&self.picker, session.available_moves(&self.picker)),
            ui::history::view(&history, session.checklist().log_enabled()),
        ]
        .spacing(12)
        .width(Length::Fixed(220.0))
        .height(Length::Fill);

        let save_label = session
            .save_path()
            .map(file_label)
            .unwrap_or_else(|| "none".to_string());
        let status_bar = row![
            text(format!("Save file: {}", save_label)).size(13),
            horizontal_space(),
            text(&self.status).size(13),
            horizontal_space(),
            text(format!("Used: {}", session.progress())).size(13),
        ]
        .spacing(10);

        column![
            toolbar,
            filters,
            row![ui::move_table::view(&rows, &self.filter), side_panel]
                .spacing(10)
                .height(Length::Fill),
            status_bar,
        ]
        .spacing(8)
        .padding(10)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.settings.general.theme {
            ThemeChoice::Default => Theme::default(),
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        }
    }

    /// Periodic auto-save ticks
    fn subscription(&self) -> Subscription<Message> {
        match self.settings.auto_save_every() {
            Some(every) => time::every(every).map(|_| Message::AutoSaveTick),
            None => Subscription::none(),
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load();
    let window = Size::new(
        settings.general.window_width as f32,
        settings.general.window_height as f32,
    );
    info!("Starting with catalog {}", settings.challenge.catalog_path.display());

    iced::application("All-Move Challenge Tracker", Tracker::update, Tracker::view)
        .theme(Tracker::theme)
        .subscription(Tracker::subscription)
        .window_size(window)
        .centered()
        .run_with(move || Tracker::new(settings))
}

fn load_catalog_task(path: PathBuf) -> Task<Message> {
    Task::perform(catalog::load_catalog_async(path), |result| {
        Message::CatalogLoaded(result.map(Arc::new))
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Ask a yes/no question with a native dialog
fn confirm(title: &str, description: &str) -> bool {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show();
    matches!(answer, MessageDialogResult::Yes)
}

fn alert(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn report_error(title: &str, err: &TrackerError) {
    error!("{}: {}", title, err);
    alert(MessageLevel::Error, title, &err.to_string());
}
