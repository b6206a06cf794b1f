use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use eframe::egui::Context;

use crate::feed::{PollResult, SnapshotSource, Suggestion, spawn_poller};

mod render_utils;
mod sim;
mod ui;
mod view;

use sim::{SimConfig, Simulation};

pub struct ConsensusApp {
    rx: Receiver<PollResult>,
    model: Box<ViewModel>,
    disconnected: bool,
}

struct ViewModel {
    sim: Simulation,
    source_label: String,
    last_update: Option<Instant>,
    poll_failures: u64,
    last_error: Option<String>,
    show_zone_overlay: bool,
    suggestion_count: usize,
    opinion_count: usize,
}

impl ConsensusApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: SnapshotSource,
        interval: Duration,
    ) -> Self {
        let source_label = source.label();
        let rx = spawn_poller(source, interval);

        Self {
            rx,
            model: Box::new(ViewModel::new(source_label)),
            disconnected: false,
        }
    }
}

impl eframe::App for ConsensusApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(suggestions)) => self.model.apply_snapshot(&suggestions),
                Ok(Err(message)) => self.model.note_poll_failure(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }

        self.model.show(ctx, self.disconnected);

        // The poll thread has no way to wake the UI, so schedule a frame
        // often enough to notice fresh snapshots while settled.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

impl ViewModel {
    fn apply_snapshot(&mut self, suggestions: &[Suggestion]) {
        self.suggestion_count = suggestions.len();
        self.opinion_count = suggestions
            .iter()
            .map(|suggestion| suggestion.people_opinions.len())
            .sum();
        self.last_update = Some(Instant::now());
        self.last_error = None;
        self.sim.apply_snapshot(suggestions);
    }

    /// Fetch or parse failures keep the last good layout on screen.
    fn note_poll_failure(&mut self, message: String) {
        self.poll_failures += 1;
        self.last_error = Some(message);
    }
}
