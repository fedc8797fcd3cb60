//! Ferret - a terminal browser for a remote file store

use std::io::{self, stdout};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::Style,
    Frame, Terminal,
};
use tracing::{error, info};

mod api;
mod async_io;
mod config;
mod errors;
mod input;
mod logging;
mod state;
mod ui;
mod view;

use api::HttpApi;
use config::Config;
use state::app::App;
use state::mode::{Mode, PromptKind};
use state::ui_state::Hit;
use ui::breadcrumb::crumb_areas;
use ui::grid::name_area;
use ui::menu::{item_area, menu_rect};
use ui::preview::footer_buttons;
use ui::{
    BreadcrumbBar, CardGrid, ConfirmDeleteDialog, ErrorView, GridLayout, HelpViewer, KeyBar, OptionsMenuWidget,
    PreviewOverlay, PromptDialog, Spinner, StatusBar,
};
use view::{Body, BrowserView};

const USAGE: &str = "Usage: ferret [URL] [--path PATH] [--config FILE]

  URL            Server to browse (overrides [server] url)
  --path PATH    Directory to open first
  --config FILE  Configuration file to use
  -h, --help     Show this message";

/// Command line overrides
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    url: Option<String>,
    path: Option<String>,
    config: Option<PathBuf>,
    help: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--path" => {
                parsed.path = Some(args.next().ok_or("--path needs a directory")?);
            }
            "--config" => {
                parsed.config = Some(args.next().ok_or("--config needs a file")?.into());
            }
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            other => {
                if parsed.url.is_some() {
                    return Err(format!("Unexpected argument: {}", other));
                }
                parsed.url = Some(other.to_string());
            }
        }
    }
    Ok(parsed)
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.server.url = url.clone();
        }
        if let Some(path) = &self.path {
            config.browser.start_path = path.clone();
            config.browser.last_path = None;
        }
    }
}

/// Set up panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Initialize the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}

/// Draw one frame and record where everything clickable landed
fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    app.ui.begin_frame(size.width, size.height);

    let busy = app.is_busy();
    let url = app.preview_url();
    let help = matches!(app.mode, Mode::Help { .. }).then(|| input::help_text(&app.config.keybindings));
    let theme = &app.theme;
    let view = BrowserView::build(&app.session);

    let [crumb_row, body, status_row, key_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(size);

    frame.render_widget(BreadcrumbBar::new(&view.breadcrumb, theme), crumb_row);
    for (crumb, area) in view.breadcrumb.iter().zip(crumb_areas(&view.breadcrumb, crumb_row)) {
        if let Some(area) = area {
            app.ui.push_hit(area, Hit::Crumb(crumb.target.clone()));
        }
    }

    match &view.body {
        Body::Loading => {
            let spinner = Spinner::new(app.ui.spinner_frame, "Loading...")
                .spinner_style(Style::default().fg(theme.spinner))
                .message_style(Style::default().fg(theme.card_text));
            frame.render_widget(spinner, body);
        }
        Body::Error(message) => frame.render_widget(ErrorView::new(message, theme), body),
        Body::Cards(cards) => {
            let layout = GridLayout::new(body, cards.len(), view.cursor, app.ui.grid_scroll);
            app.ui.grid_columns = layout.columns;
            app.ui.grid_rows = layout.rows;
            app.ui.grid_scroll = layout.scroll;
            for index in layout.visible(cards.len()) {
                if let Some(rect) = layout.card_area(index) {
                    app.ui.push_hit(rect, Hit::Card(index));
                    app.ui.push_hit(name_area(rect), Hit::CardName(index));
                }
            }
            let grid = CardGrid::new(cards, layout, view.cursor, theme).with_editing(app.mode.editing());
            frame.render_widget(grid, body);
        }
    }

    frame.render_widget(StatusBar::new(&view, theme).with_busy(busy), status_row);
    frame.render_widget(KeyBar::new(&app.config.keybindings, theme), key_row);

    if let Some(preview) = view.preview {
        app.ui.page_height = PreviewOverlay::content_height(size);
        for (rect, hit, _) in footer_buttons(size, preview.kind) {
            app.ui.push_hit(rect, hit);
        }
        let overlay = PreviewOverlay::new(preview, theme)
            .with_url(url.as_deref())
            .with_total(app.session.file_list().len());
        frame.render_widget(overlay, size);
    }

    match &app.mode {
        Mode::ConfirmDelete { targets, focus } => {
            if let Some(dialog) = ConfirmDeleteDialog::area(size) {
                let buttons = ConfirmDeleteDialog::button_areas(dialog);
                for (rect, hit) in buttons.into_iter().zip([Hit::DialogConfirm, Hit::DialogCancel]) {
                    app.ui.push_hit(rect, hit);
                }
            }
            let single = match targets.as_slice() {
                [only] => Some(only.name.as_str()),
                _ => None,
            };
            frame.render_widget(ConfirmDeleteDialog::new(targets.len(), *focus, theme).with_name(single), size);
        }
        Mode::Prompt { kind, input, cursor } => {
            if let Some(dialog) = PromptDialog::area(size) {
                let buttons = PromptDialog::button_areas(dialog);
                for (rect, hit) in buttons.into_iter().zip([Hit::DialogConfirm, Hit::DialogCancel]) {
                    app.ui.push_hit(rect, hit);
                }
            }
            let (title, label, help) = match kind {
                PromptKind::Upload => (
                    "Upload",
                    "Local files (quote names with spaces):".to_string(),
                    "Enter: Upload  Esc: Cancel",
                ),
                PromptKind::Copy { source } => ("Copy", format!("Copy {} as:", source), "Enter: Copy  Esc: Cancel"),
            };
            let dialog = PromptDialog::new(title, &label, input, *cursor, theme).with_help(help);
            frame.render_widget(dialog, size);
        }
        Mode::Help { scroll } => {
            app.ui.page_height = HelpViewer::content_height(size);
            let text = help.as_deref().unwrap_or_default();
            frame.render_widget(HelpViewer::new(text, *scroll, theme), size);
        }
        _ => {}
    }

    if let Some(menu) = &app.menu {
        let rect = menu_rect(menu, size);
        app.ui.menu_area = Some(rect);
        for i in 0..state::mode::MenuItem::ALL.len() {
            app.ui.push_hit(item_area(rect, i), Hit::MenuItem(i));
        }
        frame.render_widget(OptionsMenuWidget::new(menu, theme), rect);
    }
}

/// Main event loop
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        app.pump();
        terminal.draw(|frame| draw(frame, app))?;
        app.tick();

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            app.shutdown();
            break;
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config_path = args.config.clone().or_else(config::config_file);
    let mut config = match &config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    args.apply(&mut config);

    let _log_guard = logging::init_logging(&config.logging);

    let api = match HttpApi::new(&config.server.url, config.server.timeout(), config.server.escape_paths) {
        Ok(api) => api,
        Err(e) => {
            error!("Could not set up the HTTP client: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!("Browsing {}", config.server.url);

    setup_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut app = App::new(config, config_path, Arc::new(api));

    let result = run(&mut terminal, &mut app);

    restore_terminal()?;
    if let Err(e) = &result {
        error!("Terminal error: {}", e);
    }
    result
}
