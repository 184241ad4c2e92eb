//! # Arm worker thread
//!
//! The arm's motions block, and its state isn't safe to share. Where several threads need to
//! command the arm, one worker thread owns the [`ArmBot`] and runs commands one at a time in the
//! order they arrive.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use embedded_hal::blocking::delay::DelayMs;
use log::{debug, info, warn};
use std::{
    sync::mpsc::{channel, Receiver, Sender},
    thread::{self, JoinHandle},
};

use crate::{
    arm_ctrl::{ArmBot, ArmError, ArmStatus},
    buzzer::ToneGenerator,
    cmd::ArmCmd,
    serial::TextSink,
    servo_ctrl::Actuator,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

type Request = (ArmCmd, Sender<ArmResponse>);

/// Result of a command run by the worker.
pub type ArmResponse = Result<ArmStatus, ArmError>;

/// Handle to a thread owning the arm.
///
/// Dropping the handle ends the arm and joins the thread.
pub struct ArmWorker {
    sender: Option<Sender<Request>>,

    handle: Option<JoinHandle<()>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmWorker {
    /// Move the arm onto a new worker thread.
    pub fn spawn<A, T, S, D>(bot: ArmBot<A, T, S, D>) -> Self
    where
        A: Actuator + Send + 'static,
        T: ToneGenerator + Send + 'static,
        S: TextSink + Send + 'static,
        D: DelayMs<u32> + Send + 'static,
    {
        let (tx, rx) = channel();

        let handle = thread::Builder::new()
            .name("arm_worker".into())
            .spawn(move || worker_thread(bot, rx));

        let handle = match handle {
            Ok(h) => Some(h),
            Err(e) => {
                warn!("Couldn't spawn the arm worker thread: {}", e);
                None
            }
        };

        Self {
            sender: Some(tx),
            handle,
        }
    }

    /// Run a command on the worker, blocking until it has completed.
    pub fn execute(&self, cmd: ArmCmd) -> ArmResponse {
        let sender = self.sender.as_ref().ok_or(ArmError::WorkerDisconnected)?;
        let (reply_tx, reply_rx) = channel();

        sender
            .send((cmd, reply_tx))
            .map_err(|_| ArmError::WorkerDisconnected)?;

        reply_rx.recv().map_err(|_| ArmError::WorkerDisconnected)?
    }

    /// Queue a command without waiting for it.
    ///
    /// The response is delivered on the returned receiver.
    pub fn submit(&self, cmd: ArmCmd) -> Result<Receiver<ArmResponse>, ArmError> {
        let sender = self.sender.as_ref().ok_or(ArmError::WorkerDisconnected)?;
        let (reply_tx, reply_rx) = channel();

        sender
            .send((cmd, reply_tx))
            .map_err(|_| ArmError::WorkerDisconnected)?;

        Ok(reply_rx)
    }

    /// Stop the worker once every queued command has run.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Closing the channel lets the thread finish its queue and exit
        self.sender.take();

        if let Some(h) = self.handle.take() {
            if h.join().is_err() {
                warn!("Arm worker thread panicked");
            }
        }
    }
}

impl Drop for ArmWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn worker_thread<A, T, S, D>(mut bot: ArmBot<A, T, S, D>, receiver: Receiver<Request>)
where
    A: Actuator,
    T: ToneGenerator,
    S: TextSink,
    D: DelayMs<u32>,
{
    info!("Arm worker started");

    for (cmd, reply) in receiver.iter() {
        let response = bot.execute(&cmd);

        if reply.send(response).is_err() {
            debug!("Requester of {:?} went away before the reply", cmd);
        }
    }

    if bot.is_attached() {
        bot.end();
    }

    info!("Arm worker stopped");
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        arm_ctrl::Params,
        axis::AxisId,
        sim::{sim_armbot, SimEvent},
    };

    #[test]
    fn test_worker_runs_commands_in_order() {
        let (bot, log) = sim_armbot(Params::default(), false);
        let worker = ArmWorker::spawn(bot);

        worker.execute(ArmCmd::Begin).unwrap();
        let pending = worker
            .submit(ArmCmd::Axis { axis: AxisId::Axis1, angle_deg: 93, step_delay_ms: 1 })
            .unwrap();
        let status = worker.execute(ArmCmd::Status).unwrap();

        // The motion was queued first so it has completed
        assert_eq!(status.axes[0].position_deg, Some(93));
        assert!(pending.recv().unwrap().is_ok());
        assert_eq!(log.writes_to(0), vec![90, 91, 92, 93]);

        worker.shutdown();

        // Shutting down detaches the servos
        assert_eq!(log.events().last(), Some(&SimEvent::Detach { pin: 3 }));
    }

    #[test]
    fn test_worker_returns_errors() {
        let mut params = Params::default();
        params.strict = true;
        let (bot, _log) = sim_armbot(params, false);
        let worker = ArmWorker::spawn(bot);

        let r = worker.execute(ArmCmd::Axis { axis: AxisId::Gripper, angle_deg: 200, step_delay_ms: 0 });
        assert!(matches!(r, Err(ArmError::OutOfRange { .. })));

        // The worker keeps going after an error
        assert!(worker.execute(ArmCmd::Status).is_ok());
    }
}
