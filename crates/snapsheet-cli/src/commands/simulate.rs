use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use snapsheet_core::{
    BottomSheetEngine, Channel, ContentCommand, EngineOutput, GestureState, SheetConfig,
};

use crate::OutputFormat;

/// Upper bound on frames spent waiting for the sheet to come to rest
const MAX_SETTLE_FRAMES: u64 = 10_000;

/// A gesture scenario replayed frame by frame
#[derive(Debug, Deserialize)]
pub struct Script {
    /// Frame interval in milliseconds
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Replaces the loaded configuration for this run
    #[serde(default)]
    pub config: Option<SheetConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_frame_ms() -> u64 {
    16
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// One drag gesture: began, one active sample per frame, then ended
    Drag {
        channel: Channel,
        translations: Vec<f64>,
        #[serde(default)]
        velocity: f64,
        /// Lift the finger after the last sample
        #[serde(default = "default_true")]
        release: bool,
    },
    /// Report the content's scroll offset
    Scroll { offset: f64 },
    /// Request a snap to an index
    SnapTo { index: usize },
    /// Let frames pass without input
    Wait { ms: u64 },
    /// Change the container height
    Resize { height: f64 },
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let script: Self = toml::from_str(content).context("Invalid scenario script")?;
        if script.frame_ms == 0 {
            bail!("frame_ms must be positive");
        }
        Ok(script)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub frame: u64,
    pub time_ms: u64,
    #[serde(flatten)]
    pub output: EngineOutput,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettleEvent {
    pub frame: u64,
    pub time_ms: u64,
    pub index: usize,
}

/// Everything observed while replaying a script
#[derive(Debug, Serialize)]
pub struct Report {
    pub frames: Vec<Frame>,
    pub settles: Vec<SettleEvent>,
    pub final_output: EngineOutput,
}

struct Runner {
    engine: BottomSheetEngine,
    frame_delta: Duration,
    frame: u64,
    settled: Rc<RefCell<Vec<usize>>>,
    frames: Vec<Frame>,
    settles: Vec<SettleEvent>,
}

impl Runner {
    fn new(config: SheetConfig, frame_ms: u64) -> Result<Self> {
        let mut engine = BottomSheetEngine::new(config)?;
        let settled = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&settled);
        engine.on_settle(move |index| sink.borrow_mut().push(index));

        Ok(Self {
            engine,
            frame_delta: Duration::from_millis(frame_ms),
            frame: 0,
            settled,
            frames: Vec::new(),
            settles: Vec::new(),
        })
    }

    fn time_ms(&self) -> u64 {
        self.frame * self.frame_delta.as_millis() as u64
    }

    fn tick(&mut self) {
        self.frame += 1;
        let output = self.engine.tick(self.frame_delta).clone();
        let time_ms = self.time_ms();

        for index in self.settled.borrow_mut().drain(..) {
            self.settles.push(SettleEvent {
                frame: self.frame,
                time_ms,
                index,
            });
        }
        self.frames.push(Frame {
            frame: self.frame,
            time_ms,
            output,
        });
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        debug!(?step, frame = self.frame, "Applying step");
        match step {
            Step::Drag {
                channel,
                translations,
                velocity,
                release,
            } => {
                self.engine.drag(*channel, GestureState::Began, 0.0, 0.0);
                self.tick();
                for &translation in translations {
                    self.engine
                        .drag(*channel, GestureState::Active, translation, *velocity);
                    self.tick();
                }
                if *release {
                    let last = translations.last().copied().unwrap_or(0.0);
                    self.engine.drag(*channel, GestureState::Ended, last, *velocity);
                    self.tick();
                }
            }
            Step::Scroll { offset } => {
                self.engine.scroll(*offset);
                self.tick();
            }
            Step::SnapTo { index } => {
                self.engine.snap_to(*index)?;
                self.tick();
            }
            Step::Wait { ms } => {
                let frame_ms = self.frame_delta.as_millis() as u64;
                for _ in 0..ms.div_ceil(frame_ms) {
                    self.tick();
                }
            }
            Step::Resize { height } => {
                self.engine.set_container_height(*height)?;
                self.tick();
            }
        }
        Ok(())
    }

    fn settle(&mut self) -> Result<()> {
        let mut remaining = MAX_SETTLE_FRAMES;
        while self.engine.is_animating() {
            if remaining == 0 {
                bail!("sheet did not come to rest within {} frames", MAX_SETTLE_FRAMES);
            }
            remaining -= 1;
            self.tick();
        }
        Ok(())
    }
}

/// Replay `script` and collect every frame
pub fn simulate(config: SheetConfig, script: &Script) -> Result<Report> {
    let mut runner = Runner::new(config, script.frame_ms)?;
    for step in &script.steps {
        runner.apply(step)?;
    }
    runner.settle()?;

    info!(frames = runner.frame, settles = runner.settles.len(), "Scenario finished");
    Ok(Report {
        final_output: runner.engine.output().clone(),
        frames: runner.frames,
        settles: runner.settles,
    })
}

pub fn run(config: &SheetConfig, script_path: &Path, all_frames: bool, format: OutputFormat) -> Result<()> {
    let script = Script::from_path(script_path)?;
    let config = script.config.clone().unwrap_or_else(|| config.clone());
    let report = simulate(config, &script)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report, all_frames),
    }

    Ok(())
}

fn print_text(report: &Report, all_frames: bool) {
    let mut settles = report.settles.iter().peekable();

    for frame in &report.frames {
        let output = &frame.output;
        if all_frames {
            let resting = match output.resting_index {
                Some(index) => format!("  rest {}", index),
                None => String::new(),
            };
            println!(
                "{:>6} ms  offset {:>8.2}  position {:.3}{}",
                frame.time_ms, output.current_offset, output.normalized_position, resting
            );
        }
        if output.content_command == Some(ContentCommand::ScrollToTop) {
            println!("{:>6} ms  content scrolled to top", frame.time_ms);
        }
        while let Some(settle) = settles.next_if(|s| s.frame == frame.frame) {
            println!(
                "{:>6} ms  settled at index {} (offset {:.1})",
                settle.time_ms, settle.index, output.current_offset
            );
        }
    }

    let last = &report.final_output;
    println!();
    println!("Frames:           {}", report.frames.len());
    println!("Final offset:     {:.2}", last.current_offset);
    println!("Position:         {:.3}", last.normalized_position);
    match last.resting_index {
        Some(index) => println!("Resting index:    {}", index),
        None => println!("Resting index:    (between snap points)"),
    }
    println!("Deceleration:     {}", last.deceleration_rate);
    println!("Scroll activates: {:.1}", last.scroll_activation_distance);
}
