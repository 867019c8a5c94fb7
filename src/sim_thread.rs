//! Simulation thread that runs independently from the host render loop.
//!
//! One thread owns the world and the camera controller; the host
//! controls it over a command channel and receives [`WorldSnapshot`]s
//! back. Restart is atomic: the world is rebuilt between ticks, never
//! mutated mid-tick.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::info;

use crate::camera::CameraController;
use crate::commands::{SimCommand, SimState};
use crate::config::Config;
use crate::grid::Position;
use crate::snapshot::WorldSnapshot;
use crate::world::World;

/// Minimum interval between ticks at speed 1.0. Effectively "as fast as
/// the host consumes frames".
const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Pause between loop passes so an idle simulation does not spin.
const LOOP_REST: Duration = Duration::from_millis(2);

/// Handle for controlling the simulation thread
pub struct SimulationHandle {
    thread: Option<JoinHandle<()>>,
    command_tx: Sender<SimCommand>,
    snapshot_rx: Receiver<WorldSnapshot>,
    pub state: SimState,
}

impl SimulationHandle {
    /// Spawn a new simulation thread
    pub fn spawn(config: Config) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        let (snapshot_tx, snapshot_rx) = mpsc::channel();

        let thread = thread::spawn(move || {
            run_simulation(config, command_rx, snapshot_tx);
        });

        Self {
            thread: Some(thread),
            command_tx,
            snapshot_rx,
            state: SimState::Running,
        }
    }

    /// Send a command to the simulation
    pub fn send(&mut self, command: SimCommand) {
        match &command {
            SimCommand::Pause => self.state = SimState::Paused,
            SimCommand::Resume => self.state = SimState::Running,
            SimCommand::Shutdown => self.state = SimState::Stopped,
            _ => {}
        }
        let _ = self.command_tx.send(command);
    }

    /// Latest snapshot, draining any backlog (non-blocking)
    pub fn try_recv_snapshot(&self) -> Option<WorldSnapshot> {
        let mut latest = None;
        loop {
            match self.snapshot_rx.try_recv() {
                Ok(snapshot) => latest = Some(snapshot),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }

    /// Blocking snapshot receive with a timeout
    pub fn recv_snapshot_timeout(&self, timeout: Duration) -> Option<WorldSnapshot> {
        self.snapshot_rx.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    /// Shutdown the simulation thread
    pub fn shutdown(&mut self) {
        self.send(SimCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Main simulation loop running in a separate thread
fn run_simulation(
    config: Config,
    command_rx: Receiver<SimCommand>,
    snapshot_tx: Sender<WorldSnapshot>,
) {
    let mut current_config = config;
    let mut world = World::new(current_config.clone());
    let mut camera = CameraController::new(current_config.camera.clone(), world.grid);
    let mut state = SimState::Running;
    let mut speed = 1.0f32;

    let mut last_tick = Instant::now();
    let mut last_frame = Instant::now();

    loop {
        // Drain all pending commands before ticking
        loop {
            match command_rx.try_recv() {
                Ok(SimCommand::Pause) => state = SimState::Paused,
                Ok(SimCommand::Resume) => state = SimState::Running,
                Ok(SimCommand::Step) => {
                    if state == SimState::Paused {
                        world.step();
                    }
                }
                Ok(SimCommand::SetSpeed(s)) => speed = s.clamp(0.1, 10.0),
                Ok(SimCommand::Reset) => {
                    info!("restarting simulation");
                    world = World::new(current_config.clone());
                    camera.reset(world.grid);
                }
                Ok(SimCommand::ResetWithSettings(settings)) => {
                    info!("restarting simulation with new settings");
                    settings.apply_to(&mut current_config);
                    current_config.sanitize();
                    world = World::new(current_config.clone());
                    camera.reset(world.grid);
                }
                Ok(SimCommand::SpawnFoodAtCursor { ndc_x, ndc_y, aspect }) => {
                    let base = camera.cursor_cell(ndc_x, ndc_y, aspect);
                    world.spawn_food_burst(base);
                }
                Ok(SimCommand::SpawnFoodAt { x, y, z }) => {
                    world.spawn_food_burst(Position::new(x, y, z));
                }
                Ok(SimCommand::Shutdown) => {
                    info!("simulation thread shutting down at tick {}", world.tick);
                    return;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }

        let now = Instant::now();
        if state == SimState::Running
            && now.duration_since(last_tick) >= TICK_INTERVAL.div_f32(speed)
        {
            world.step();
            last_tick = now;
        }

        // Camera runs every frame, not per tick
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        camera.update(world.live_bounds(), dt);

        if snapshot_tx.send(world.snapshot(camera.view())).is_err() {
            return; // host dropped the receiver
        }

        thread::sleep(LOOP_REST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.world.base_grid_size = 20;
        config.world.aspect_ratio = 1.0;
        config.snakes.count = 5;
        config.snakes.initial_length = 3;
        config.food.count = 10;
        config
    }

    #[test]
    fn test_thread_produces_snapshots() {
        let mut handle = SimulationHandle::spawn(small_config());
        let snapshot = handle
            .recv_snapshot_timeout(Duration::from_secs(5))
            .expect("no snapshot received");
        assert_eq!(snapshot.snakes.len(), 5);
        handle.shutdown();
        assert_eq!(handle.state, SimState::Stopped);
    }

    #[test]
    fn test_pause_and_step() {
        let mut handle = SimulationHandle::spawn(small_config());
        handle.send(SimCommand::Pause);
        assert!(!handle.is_running());
        handle.send(SimCommand::Step);
        // Still produces frames while paused
        assert!(handle.recv_snapshot_timeout(Duration::from_secs(5)).is_some());
        handle.shutdown();
    }

    #[test]
    fn test_reset_rebuilds_world() {
        let mut handle = SimulationHandle::spawn(small_config());
        let mut settings = crate::commands::SimSettings::from_config(&small_config());
        settings.snake_count = 8;
        handle.send(SimCommand::ResetWithSettings(settings));

        // Wait for a snapshot reflecting the rebuilt world
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = 0;
        while Instant::now() < deadline {
            if let Some(snapshot) = handle.recv_snapshot_timeout(Duration::from_millis(200)) {
                seen = snapshot.snakes.len();
                if seen >= 8 {
                    break;
                }
            }
        }
        assert!(seen >= 8, "world was not rebuilt: {} snakes", seen);
        handle.shutdown();
    }
}
