//! Robot search on a background thread.
//!
//! The worker owns the robot and its board copy outright; the only thing
//! crossing back is the chosen move, over a one-shot channel.

use std::any::Any;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use log::error;

use super::Robot;
use crate::core::{EngineError, EngineResult};
use crate::rules::GameBoard;
use crate::search::Evaluator;

/// A robot move being computed on another thread.
pub struct RobotWorker<M> {
    handle: Option<JoinHandle<()>>,
    receiver: Receiver<EngineResult<Option<M>>>,
}

impl<M: Send + 'static> RobotWorker<M> {
    /// Prepare `robot` against `live` on the calling thread, then search on
    /// a new one.
    pub fn spawn<B, E>(mut robot: Robot<B, E>, live: &B) -> EngineResult<Self>
    where
        B: GameBoard<Move = M>,
        E: Evaluator<B> + Clone + 'static,
    {
        robot.prepare_to_move(live)?;
        let (tx, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("robot".to_string())
            .spawn(move || {
                // the receiver may already be gone; nothing to report then
                let _ = tx.send(robot.select_move());
            })?;
        Ok(Self {
            handle: Some(handle),
            receiver,
        })
    }

    /// The result if the search has finished, without blocking.
    ///
    /// A worker that died without sending reports
    /// [`EngineError::RobotPanicked`].
    pub fn try_result(&mut self) -> Option<EngineResult<Option<M>>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(self.join().and(result)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(self.lost_worker())),
        }
    }

    /// Block until the search finishes.
    pub fn wait(mut self) -> EngineResult<Option<M>> {
        match self.receiver.recv() {
            Ok(result) => self.join().and(result),
            Err(_) => Err(self.lost_worker()),
        }
    }

    fn join(&mut self) -> EngineResult<()> {
        match self.handle.take().map(JoinHandle::join) {
            Some(Err(payload)) => Err(panicked(payload.as_ref())),
            _ => Ok(()),
        }
    }

    fn lost_worker(&mut self) -> EngineError {
        match self.join() {
            Err(e) => e,
            Ok(()) => EngineError::RobotPanicked("worker exited without a move".to_string()),
        }
    }
}

fn panicked(payload: &(dyn Any + Send)) -> EngineError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!("robot: worker panicked: {message}");
    EngineError::RobotPanicked(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::RobotConfig;
    use crate::search::SearchConfig;
    use crate::testing::{pile_eval, PileBoard};

    #[test]
    fn test_worker_returns_the_robot_move() {
        let live = PileBoard::new(6, None);
        let config = RobotConfig {
            search: SearchConfig::default().with_depth(2),
            ..RobotConfig::default()
        };
        let worker = RobotWorker::spawn(Robot::new(config, pile_eval), &live).unwrap();
        let m = worker.wait().unwrap().unwrap();
        assert_eq!(m.count, 2);
    }

    #[test]
    fn test_worker_reports_no_move_on_finished_game() {
        let mut live = PileBoard::new(2, None);
        let mut take = crate::testing::Take::new(2, crate::core::PlayerId::new(0));
        live.execute(&mut take, crate::core::ReplayMode::Live).unwrap();
        let mut worker =
            RobotWorker::spawn(Robot::new(RobotConfig::default(), pile_eval), &live).unwrap();
        let result = loop {
            if let Some(r) = worker.try_result() {
                break r;
            }
            thread::yield_now();
        };
        assert!(result.unwrap().is_none());
    }

    fn exploding_eval(_: &PileBoard, _: crate::core::PlayerId) -> f64 {
        panic!("evaluator exploded")
    }

    fn shallow() -> RobotConfig {
        RobotConfig {
            search: SearchConfig::default().with_depth(1),
            ..RobotConfig::default()
        }
    }

    #[test]
    fn test_wait_reports_search_panic() {
        let live = PileBoard::new(6, None);
        let worker = RobotWorker::spawn(Robot::new(shallow(), exploding_eval), &live).unwrap();
        match worker.wait() {
            Err(EngineError::RobotPanicked(message)) => {
                assert!(message.contains("evaluator exploded"));
            }
            other => panic!("expected RobotPanicked, got {other:?}"),
        }
    }

    #[test]
    fn test_try_result_reports_search_panic() {
        let live = PileBoard::new(6, None);
        let mut worker = RobotWorker::spawn(Robot::new(shallow(), exploding_eval), &live).unwrap();
        let result = loop {
            if let Some(r) = worker.try_result() {
                break r;
            }
            thread::yield_now();
        };
        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, EngineError::RobotPanicked(_)));
    }
}
