//! Interactive widget session.
//!
//! One [`AmbientApp`] lives for the whole session. Commands arrive one per
//! line on stdin while a [`TimerDriver`] ticks the timer in the background;
//! every tick redraws the timer face on stdout.

use std::sync::{Arc, Mutex};

use ambiroom_core::{
    AmbientApp, Config, Event, LogNotifier, Notifier, SharedApp, SilentPlayer, TimerDriver,
    TimerMode, UiSection, UiState,
};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::notifier::DesktopNotifier;

#[derive(Args)]
pub struct SessionArgs {
    /// Initial timer mode
    #[arg(long, default_value = "clock")]
    mode: TimerMode,
    /// Focus duration in seconds (overrides config)
    #[arg(long)]
    focus: Option<i64>,
    /// Break duration in seconds (overrides config)
    #[arg(long = "break")]
    break_time: Option<i64>,
    /// Keep running across phase changes and resets
    #[arg(long)]
    auto_start: bool,
    /// Show minutes only
    #[arg(long)]
    hide_seconds: bool,
    /// Disable phase notifications
    #[arg(long)]
    no_notifications: bool,
    /// Send notifications to the desktop instead of the log
    #[arg(long)]
    desktop_notifications: bool,
    /// Start the timer right away
    #[arg(long)]
    start: bool,
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Start the timer
    Start,
    /// Pause the timer
    Pause,
    /// Reload the current phase's duration
    Reset,
    /// Switch between focus and break
    Break,
    /// Add (or with a negative value remove) seconds
    Add {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
    /// Switch timer mode
    Mode { mode: TimerMode },
    /// Todo list
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },
    /// Ambient sounds
    Sound {
        #[command(subcommand)]
        action: SoundAction,
    },
    /// Saved sound mixes
    Mix {
        #[command(subcommand)]
        action: MixAction,
    },
    /// Change a timer setting (focus_time, break_time, auto_start,
    /// hide_seconds, sound_effects, browser_notifications)
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Toggle a widget section
    Show { section: UiSection },
    /// Hide the controls until hovered
    Autohide {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    /// Print the whole widget state
    Status {
        /// Print the timer snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
enum TodoAction {
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    Done { id: String },
    Rm { id: String },
    Focus { id: String },
    Unfocus,
    Clear,
    List,
}

#[derive(Subcommand, Debug)]
enum SoundAction {
    Toggle { id: String, volume: Option<f32> },
    Vol { id: String, volume: f32 },
    Stop,
    Mixmode {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum MixAction {
    Save {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    Load { id: String },
    Rm { id: String },
    List,
}

/// What the session loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(args: SessionArgs, mut config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(focus) = args.focus {
        config.timer.focus_time = focus;
    }
    if let Some(break_time) = args.break_time {
        config.timer.break_time = break_time;
    }
    config.timer.auto_start |= args.auto_start;
    config.timer.hide_seconds |= args.hide_seconds;
    if args.no_notifications {
        config.timer.browser_notifications = false;
    }

    let notifier: Arc<dyn Notifier> = if args.desktop_notifications {
        Arc::new(DesktopNotifier)
    } else {
        Arc::new(LogNotifier)
    };
    let mut app = AmbientApp::new(&config, notifier, Arc::new(SilentPlayer));
    app.timer.set_mode(args.mode);
    if args.start {
        app.timer.start();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(Arc::new(Mutex::new(app))))
}

async fn session_loop(app: SharedApp) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver = TimerDriver::new(Arc::clone(&app), tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", with_app(&app, |app| Ok(status(app)))?);
    driver.sync();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match with_app(&app, |app| execute_line(app, line)) {
                    Ok((output, flow)) => {
                        if !output.is_empty() {
                            println!("{output}");
                        }
                        if flow == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => eprintln!("error: {e}"),
                }
                driver.sync();
            }
            Some(event) = rx.recv() => {
                if let Some(text) = with_app(&app, |app| Ok(render_event(app, &event)))? {
                    println!("{text}");
                }
            }
        }
    }

    driver.shutdown().await;
    Ok(())
}

fn with_app<T>(
    app: &SharedApp,
    f: impl FnOnce(&mut AmbientApp) -> Result<T, Box<dyn std::error::Error>>,
) -> Result<T, Box<dyn std::error::Error>> {
    let mut guard = app.lock().map_err(|_| "app state lock poisoned")?;
    f(&mut guard)
}

fn execute_line(app: &mut AmbientApp, line: &str) -> Result<(String, Flow), Box<dyn std::error::Error>> {
    let parsed = SessionLine::try_parse_from(line.split_whitespace()).map_err(|e| {
        let message = e.to_string();
        message.trim_start_matches("error: ").trim_end().to_string()
    })?;
    execute(app, parsed.command)
}

fn execute(app: &mut AmbientApp, command: SessionCommand) -> Result<(String, Flow), Box<dyn std::error::Error>> {
    let output = match command {
        SessionCommand::Start => {
            app.timer.start();
            timer_line(app)
        }
        SessionCommand::Pause => {
            app.timer.pause();
            format!("paused at {}", app.timer.display())
        }
        SessionCommand::Reset => {
            app.timer.reset_timer();
            timer_line(app)
        }
        SessionCommand::Break => {
            app.toggle_break();
            phase_line(app)
        }
        SessionCommand::Add { seconds } => {
            app.timer.add_time(seconds);
            timer_line(app)
        }
        SessionCommand::Mode { mode } => {
            app.timer.set_mode(mode);
            timer_line(app)
        }
        SessionCommand::Todo { action } => todo(app, action)?,
        SessionCommand::Sound { action } => sound(app, action)?,
        SessionCommand::Mix { action } => mix(app, action)?,
        SessionCommand::Show { section } => {
            let visible = app.ui.toggle(section);
            format!("{section}: {}", if visible { "on" } else { "off" })
        }
        SessionCommand::Set { key, value } => {
            app.apply_setting(&key, &value)?;
            timer_line(app)
        }
        SessionCommand::Autohide { on } => {
            app.ui.set_auto_hide_controls(on);
            format!("auto-hide controls: {}", if on { "on" } else { "off" })
        }
        SessionCommand::Status { json: true } => app.snapshot_json()?,
        SessionCommand::Status { json: false } => status(app),
        SessionCommand::Quit => return Ok((String::new(), Flow::Quit)),
    };
    Ok((output, Flow::Continue))
}

fn todo(app: &mut AmbientApp, action: TodoAction) -> Result<String, Box<dyn std::error::Error>> {
    let todos = &mut app.todos;
    let output = match action {
        TodoAction::Add { text } => {
            let id = todos.add(&text.join(" "))?;
            format!("added {id}")
        }
        TodoAction::Done { id } => {
            if !todos.toggle(&id) {
                return Err(format!("no todo with id {id}").into());
            }
            list_todos(todos)
        }
        TodoAction::Rm { id } => {
            todos.delete(&id);
            list_todos(todos)
        }
        TodoAction::Focus { id } => match todos.set_current(&id) {
            Some(item) => format!("current task: {}", item.text),
            None => return Err(format!("no todo with id {id}").into()),
        },
        TodoAction::Unfocus => {
            todos.clear_current();
            "no current task".to_string()
        }
        TodoAction::Clear => format!("removed {} completed", todos.clear_completed()),
        TodoAction::List => list_todos(todos),
    };
    Ok(output)
}

fn sound(app: &mut AmbientApp, action: SoundAction) -> Result<String, Box<dyn std::error::Error>> {
    let default_volume = app.default_volume();
    let sounds = &mut app.sounds;
    let output = match action {
        SoundAction::Toggle { id, volume } => {
            let on = sounds.toggle(&id, volume.unwrap_or(default_volume))?;
            format!("{id}: {}", if on { "on" } else { "off" })
        }
        SoundAction::Vol { id, volume } => {
            if !sounds.update_volume(&id, volume) {
                return Err(format!("{id} is not playing").into());
            }
            format!("{id}: volume {:.2}", sounds.volume(&id).unwrap_or(volume))
        }
        SoundAction::Stop => {
            sounds.stop_all();
            "all sounds stopped".to_string()
        }
        SoundAction::Mixmode { on } => {
            sounds.set_mix_mode(on);
            format!("mix mode: {}", if on { "on" } else { "off" })
        }
        SoundAction::List => sounds
            .catalog()
            .iter()
            .map(|s| {
                let marker = match sounds.volume(&s.id) {
                    Some(v) => format!("playing {v:.2}"),
                    None => "-".to_string(),
                };
                format!("{:<12} {:<12} {marker}", s.id, s.name)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(output)
}

fn mix(app: &mut AmbientApp, action: MixAction) -> Result<String, Box<dyn std::error::Error>> {
    let sounds = &mut app.sounds;
    let output = match action {
        MixAction::Save { name } => {
            let mix = sounds.save_mix(&name.join(" "));
            format!("saved mix {} ({})", mix.id, mix.name)
        }
        MixAction::Load { id } => {
            let started = sounds.load_mix(&id)?;
            format!("loaded {started} sounds")
        }
        MixAction::Rm { id } => {
            sounds.delete_mix(&id);
            format!("{} saved mixes", sounds.saved_mixes().len())
        }
        MixAction::List => sounds
            .saved_mixes()
            .iter()
            .map(|m| format!("{} {} ({} sounds)", m.id, m.name, m.sounds.len()))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(output)
}

fn list_todos(todos: &ambiroom_core::TodoList) -> String {
    todos
        .items()
        .iter()
        .map(|t| {
            let done = if t.completed { "x" } else { " " };
            let current = if t.is_current_task { "*" } else { " " };
            format!("[{done}]{current} {} {}", t.id, t.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn timer_line(app: &AmbientApp) -> String {
    let timer = &app.timer;
    let state = if timer.is_running() { "running" } else { "paused" };
    format!("[{}] {} ({state})", timer.mode().label(), timer.display())
}

fn phase_line(app: &AmbientApp) -> String {
    let phase = if app.timer.is_break() { "break" } else { "focus" };
    format!("{phase}: {}", timer_line(app))
}

fn status(app: &AmbientApp) -> String {
    let mut lines = Vec::new();
    if app.ui.show_timer || app.ui.show_clock {
        lines.push(if app.timer.mode() == TimerMode::Pomodoro {
            phase_line(app)
        } else {
            timer_line(app)
        });
    }
    if app.ui.show_todo_bar {
        match app.todos.current() {
            Some(task) => lines.push(format!("current task: {}", task.text)),
            None => lines.push(format!("{} todos open", app.todos.remaining())),
        }
    }
    if app.ui.show_sound_list {
        let active: Vec<_> = app
            .sounds
            .active_sounds()
            .into_iter()
            .map(|e| format!("{} {:.2}", e.sound_id, e.volume))
            .collect();
        lines.push(if active.is_empty() {
            "sounds: none".to_string()
        } else {
            format!("sounds: {}", active.join(", "))
        });
    }
    lines.push(hidden_sections(&app.ui));
    lines.retain(|l| !l.is_empty());
    lines.join("\n")
}

fn hidden_sections(ui: &UiState) -> String {
    let hidden: Vec<_> = UiSection::ALL
        .into_iter()
        .filter(|s| *s != UiSection::AutoHideControls && !ui.is_visible(*s))
        .map(|s| s.as_str())
        .collect();
    if hidden.is_empty() {
        String::new()
    } else {
        format!("hidden: {}", hidden.join(", "))
    }
}

fn render_event(app: &AmbientApp, event: &Event) -> Option<String> {
    match event {
        Event::Ticked { .. } => Some(timer_line(app)),
        Event::PhaseChanged { .. } => Some(phase_line(app)),
        Event::TimerCompleted {
            mode: TimerMode::Goal,
            ..
        } => Some("goal reached".to_string()),
        _ => None,
    }
}
