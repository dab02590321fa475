//! Line-oriented terminal front-end.
//!
//! Reads commands from stdin, forwards them to the runtime handle and prints
//! notifications from every topic as they arrive.
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use pet_core::{AchievementDefinition, ActivityDefinition};
use runtime::{
    AchievementEvent, ChangeCause, Event, LifecycleEvent, PetEvent, PetSnapshot, Runtime,
    RuntimeHandle, Topic,
};

/// A parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Apply the named catalog activity.
    Activity(String),
    Status,
    Pause,
    Resume,
    Activities,
    Achievements { all: bool },
    Scenes,
    Save,
    Help,
    Quit,
}

impl Input {
    /// Parses a prompt line; `None` for blank lines.
    ///
    /// Anything that is not a keyword is treated as an activity name, so
    /// `Feed Pet` and `do Feed Pet` are equivalent.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let input = match (keyword.to_ascii_lowercase().as_str(), rest) {
            ("do", name) if !name.is_empty() => Self::Activity(name.to_string()),
            ("status", "") => Self::Status,
            ("pause", "") => Self::Pause,
            ("resume", "") => Self::Resume,
            ("activities", "") => Self::Activities,
            ("achievements", "") => Self::Achievements { all: false },
            ("achievements", "all") => Self::Achievements { all: true },
            ("scenes", "") => Self::Scenes,
            ("save", "") => Self::Save,
            ("help", "") | ("?", "") => Self::Help,
            ("quit", "") | ("exit", "") => Self::Quit,
            _ => Self::Activity(line.to_string()),
        };
        Some(input)
    }
}

const HELP: &str = "\
commands:
  <activity> | do <activity>   apply an activity, e.g. `Feed Pet`
  activities                   list the activity catalog
  status                       show the pet
  pause | resume               stop or restart attribute decay
  achievements [all]           unlocked (or all) achievements
  scenes                       scenes unlocked at the current level
  save                         write pending changes now
  quit";

pub struct App {
    runtime: Runtime,
    handle: RuntimeHandle,
}

impl App {
    pub fn new(runtime: Runtime) -> Self {
        let handle = runtime.handle();
        Self { runtime, handle }
    }

    pub async fn run(self) -> Result<()> {
        if let Some(reason) = self.runtime.recovery() {
            println!("! saved pet could not be restored ({reason}); starting fresh");
        }

        let printers = [Topic::Pet, Topic::Achievement, Topic::Lifecycle]
            .into_iter()
            .map(|topic| spawn_printer(&self.handle, topic))
            .collect::<Vec<_>>();

        println!("{}", format_snapshot(&self.handle.snapshot().await?));
        println!("type `help` for commands");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(input) = Input::parse(&line) else {
                continue;
            };
            if input == Input::Quit {
                break;
            }
            if let Err(error) = self.execute(input).await {
                tracing::warn!(error = %error, "Command failed");
                println!("! {error}");
            }
        }

        for printer in printers {
            printer.abort();
        }
        self.runtime.shutdown().await?;
        Ok(())
    }

    async fn execute(&self, input: Input) -> Result<()> {
        match input {
            Input::Activity(name) => {
                let report = self.handle.apply_activity(name).await?;
                println!(
                    "{} (+{} xp{})",
                    report.activity,
                    report.experience_gained,
                    if report.leveled_up { ", level up!" } else { "" }
                );
                println!("{}", format_snapshot(&report.snapshot));
            }
            Input::Status => println!("{}", format_snapshot(&self.handle.snapshot().await?)),
            Input::Pause => {
                if !self.handle.pause().await? {
                    println!("already paused");
                }
            }
            Input::Resume => {
                if !self.handle.resume().await? {
                    println!("already running");
                }
            }
            Input::Activities => {
                for activity in self.handle.activities() {
                    println!("{}", format_activity(&activity));
                }
            }
            Input::Achievements { all } => {
                let achievements = self.handle.achievements(!all).await?;
                if achievements.is_empty() {
                    println!("no achievements yet");
                }
                for achievement in &achievements {
                    println!("{}", format_achievement(achievement));
                }
            }
            Input::Scenes => {
                for scene in self.handle.available_scenes().await? {
                    println!("  {} (level {})", scene.display_name, scene.unlock_level);
                }
            }
            Input::Save => match self.handle.flush().await? {
                0 => println!("saved"),
                pending => println!("! {pending} writes still pending"),
            },
            Input::Help => println!("{HELP}"),
            Input::Quit => {}
        }
        Ok(())
    }
}

fn spawn_printer(handle: &RuntimeHandle, topic: Topic) -> JoinHandle<()> {
    let mut rx = handle.subscribe(topic);
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(line) = format_event(&event) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(?topic, skipped, "Event printer lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// One-line notification text. State changes caused by activities are
/// already echoed by the command, so only background changes are shown.
fn format_event(event: &Event) -> Option<String> {
    match event {
        Event::Pet(PetEvent::StateChanged { snapshot, cause }) => match cause {
            ChangeCause::Activity { .. } | ChangeCause::Tick => None,
            ChangeCause::IdleReverted => Some(format!("~ {} is idle again", snapshot.state.profile.name)),
        },
        Event::Pet(PetEvent::Sick { health, .. }) => {
            Some(format!("! your pet is sick (health {health})"))
        }
        Event::Achievement(AchievementEvent::Unlocked { achievement, .. }) => Some(format!(
            "* achievement unlocked: {} (+{} points)",
            achievement.name, achievement.points
        )),
        Event::Lifecycle(LifecycleEvent::Died { .. }) => {
            Some("! your pet died and has been reset".to_string())
        }
        Event::Lifecycle(LifecycleEvent::Paused { .. }) => Some("~ decay paused".to_string()),
        Event::Lifecycle(LifecycleEvent::Resumed { .. }) => Some("~ decay resumed".to_string()),
        Event::Lifecycle(LifecycleEvent::PersistenceWarning { error, .. }) => {
            Some(format!("! saving failed, will retry: {error}"))
        }
    }
}

fn format_snapshot(snapshot: &PetSnapshot) -> String {
    let state = &snapshot.state;
    let a = &state.attributes;
    format!(
        "{name} [{mood} @ {scene}{paused}] lvl {level} ({xp} xp)\n  \
         health {h:>3}  hunger {hu:>3}  happiness {ha:>3}  energy {e:>3}  cleanliness {c:>3}",
        name = state.profile.name,
        mood = snapshot.mood,
        scene = snapshot.scene.display_name,
        paused = if snapshot.paused { ", paused" } else { "" },
        level = state.level,
        xp = state.experience,
        h = a.health,
        hu = a.hunger,
        ha = a.happiness,
        e = a.energy,
        c = a.cleanliness,
    )
}

fn format_activity(activity: &ActivityDefinition) -> String {
    let effects = activity
        .effect
        .iter()
        .filter(|(_, amount)| *amount != 0)
        .map(|(attribute, amount)| format!("{attribute} {amount:+}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "  {:<14} {:>3} xp  {}",
        activity.name, activity.experience_points, effects
    )
}

fn format_achievement(achievement: &AchievementDefinition) -> String {
    let progress = if achievement.unlocked {
        "done".to_string()
    } else {
        format!("{}/{}", achievement.current_progress, achievement.value)
    };
    format!(
        "  {:<12} {:>4} pts  {:<8} {}",
        achievement.name, achievement.points, progress, achievement.description
    )
}
