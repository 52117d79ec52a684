use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

mod animation;

pub use self::animation::*;

use crate::common::P;
use crate::config::{ConfigError, GameConfig};
use crate::pipe::{Board, BoardGenerator, DirSet, GenerateError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Setup,
    Playing,
    Evaluating,
    Solved,
    /// The last flow leaked. Rotations are still accepted and move back to `Playing`.
    Leaking,
}

impl SessionState {
    /// After a leak the board stays rotatable.
    pub fn accepts_input(self) -> bool {
        matches!(self, SessionState::Playing | SessionState::Leaking)
    }
}

/// Input forwarded by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    RotateCell(P),
    NewGame,
    StartFlow,
    AnimationTick(usize),
}

/// What a command changed, for the front end to redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ignored,
    Rotated { pos: P, connections: DirSet },
    NewBoard,
    Leak,
    FlowStarted { path: Vec<P> },
    Flowed(FlowFrame),
    Won,
}

impl Response {
    /// Tick index to schedule next, if the animation wants one.
    pub fn next_tick(&self) -> Option<usize> {
        match self {
            Response::FlowStarted { .. } => Some(0),
            Response::Flowed(frame) => Some(frame.index + 1),
            _ => None,
        }
    }
}

/// One game: owns the board, the random source and the running animation.
pub struct Session<R: Rng> {
    config: GameConfig,
    generator: BoardGenerator,
    rng: R,
    board: Board,
    state: SessionState,
    animation: Option<FlowAnimation>,
    won: bool,
}

impl Session<StdRng> {
    /// Seeds from `config.seed`, or from the OS when unset.
    pub fn from_config(config: GameConfig) -> Result<Session<StdRng>, SessionError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Session::new(config, rng)
    }
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, mut rng: R) -> Result<Session<R>, SessionError> {
        config.validate()?;
        let generator = BoardGenerator::new(config.generator_option())?;
        let board = generator.generate(&mut rng)?;
        info!("new {}x{} game", board.size(), board.size());
        Ok(Session {
            config,
            generator,
            rng,
            board,
            state: SessionState::Playing,
            animation: None,
            won: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn state(&self) -> SessionState {
        self.state
    }
    pub fn animation(&self) -> Option<&FlowAnimation> {
        self.animation.as_ref()
    }
    pub fn connections_at(&self, pos: P) -> DirSet {
        self.board.connections_at(pos)
    }
    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn status_text(&self) -> &'static str {
        match self.state {
            SessionState::Setup => "Setting up a new board...",
            SessionState::Playing => "Connect the start (S) to the end (E)!",
            SessionState::Evaluating => "Checking the pipes...",
            SessionState::Solved if self.won => "You Win! Congratulations!",
            SessionState::Solved => "Connected! Water is flowing...",
            SessionState::Leaking => "Leak! The pipes are not connected.",
        }
    }

    /// Rotates the cell under a pixel of the drawing surface.
    pub fn click(&mut self, x: f64, y: f64) -> Response {
        match self.config.cell_at_pixel(x, y) {
            Some(pos) => self.rotate_cell(pos),
            None => Response::Ignored,
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<Response, SessionError> {
        debug!("{:?} in {:?}", command, self.state);
        let response = match command {
            Command::RotateCell(pos) => self.rotate_cell(pos),
            Command::NewGame => self.new_game()?,
            Command::StartFlow => self.start_flow(),
            Command::AnimationTick(index) => self.tick(index),
        };
        Ok(response)
    }

    fn rotate_cell(&mut self, pos: P) -> Response {
        if !self.state.accepts_input() {
            return Response::Ignored;
        }
        match self.board.rotate(pos) {
            Some(_) => {
                self.state = SessionState::Playing;
                Response::Rotated {
                    pos,
                    connections: self.board.connections_at(pos),
                }
            }
            None => Response::Ignored,
        }
    }

    fn new_game(&mut self) -> Result<Response, SessionError> {
        self.state = SessionState::Setup;
        if self.animation.take().is_some() {
            debug!("flow animation cancelled");
        }
        self.won = false;
        self.board = self.generator.generate(&mut self.rng)?;
        self.state = SessionState::Playing;
        info!("new {}x{} game", self.board.size(), self.board.size());
        Ok(Response::NewBoard)
    }

    fn start_flow(&mut self) -> Response {
        if !self.state.accepts_input() {
            return Response::Ignored;
        }
        self.state = SessionState::Evaluating;
        match self.board.flow_path() {
            Some(path) => {
                info!("connected through {} cells", path.len());
                self.state = SessionState::Solved;
                self.animation = Some(FlowAnimation::new(path.clone()));
                Response::FlowStarted { path }
            }
            None => {
                info!("leak");
                self.state = SessionState::Leaking;
                Response::Leak
            }
        }
    }

    fn tick(&mut self, index: usize) -> Response {
        let step = match self.animation.as_mut() {
            Some(animation) => animation.next_frame(index),
            None => return Response::Ignored,
        };
        match step {
            FlowStep::Frame(frame) => Response::Flowed(frame),
            FlowStep::Done => {
                self.won = true;
                info!("water reached the end");
                Response::Won
            }
            FlowStep::Stale => Response::Ignored,
        }
    }
}
