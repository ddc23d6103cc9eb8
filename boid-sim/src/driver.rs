use std::io::Write;

use anyhow::{Context, Result};
use boid_shared::FrameReport;

use crate::scene::Scene;

/// Totals reported once a run finishes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub ticks: u64,
    pub frames_written: u64,
    /// Simulated seconds at the end of the run
    pub time: f32,
}

/// Fixed-step clock driving a [`Scene`]
pub struct Simulation {
    scene: Scene,
    dt: f32,
    tick: u64,
    time: f32,
}

impl Simulation {
    pub fn new(scene: Scene, dt: f32) -> Self {
        Self {
            scene,
            dt,
            tick: 0,
            time: 0.0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the physics once, then render the resulting frame
    pub fn step(&mut self) -> FrameReport {
        let updated = self.scene.update_simulation(self.dt);
        self.tick += 1;
        self.time += self.dt;
        log::trace!("Tick {}: advanced {} objects", self.tick, updated);
        self.scene.frame(self.tick, self.time)
    }

    /// Run `ticks` steps, writing each frame as a JSON line to `output` if given.
    ///
    /// Every `summary_every` ticks (0 disables) a summary of each flock is logged.
    pub fn run<W: Write>(
        &mut self,
        ticks: u64,
        mut output: Option<&mut W>,
        summary_every: u64,
    ) -> Result<RunStats> {
        let mut stats = RunStats::default();

        for _ in 0..ticks {
            let frame = self.step();
            stats.ticks += 1;

            if let Some(out) = output.as_deref_mut() {
                write_frame(out, &frame)
                    .with_context(|| format!("Failed to write frame {}", frame.tick))?;
                stats.frames_written += 1;
            }

            if summary_every > 0 && self.tick % summary_every == 0 {
                self.log_summaries();
            }
        }

        if let Some(out) = output.as_deref_mut() {
            out.flush().context("Failed to flush frame output")?;
        }

        stats.time = self.time;
        Ok(stats)
    }

    fn log_summaries(&self) {
        for summary in self.scene.summaries() {
            match summary.centroid {
                Some(centroid) => log::info!(
                    "t={:.2}s '{}': {} boids, centroid ({:.1}, {:.1}), span {:.1}",
                    self.time,
                    summary.name,
                    summary.members,
                    centroid.x,
                    centroid.y,
                    summary.span
                ),
                None => log::info!("t={:.2}s '{}': empty", self.time, summary.name),
            }
        }
    }
}

fn write_frame<W: Write>(out: &mut W, frame: &FrameReport) -> Result<()> {
    let line = frame.to_json_line()?;
    writeln!(out, "{}", line)?;
    Ok(())
}
