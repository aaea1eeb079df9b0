//! Playing one drill round against a learner.

use drill_core::{
    Annotation, CandidateMove, Completion, MoveOutcome, Orientation, SessionError, TrainingSession,
};
use drill_core::fen::side_to_move;
use tracing::warn;

/// Something that happened during a round, for display.
#[derive(Debug)]
pub enum RoundEvent<'a> {
    /// The engine answered with `mv`, reaching `position`.
    OpponentMoved {
        mv: &'a CandidateMove,
        position: &'a str,
    },
    /// Hints stored for the position the learner is about to play from.
    Hints(&'a [Annotation]),
    /// The learner's input was not a move of any line.
    Rejected { input: &'a str },
    Completed(&'a Completion),
}

/// Learner input.
pub trait MoveSource {
    /// Next move typed at `position`, in UCI or SAN. `None` abandons the round.
    fn next_move(&mut self, position: &str, ply: usize) -> Option<String>;

    fn notify(&mut self, _event: RoundEvent<'_>) {}
}

#[derive(Debug)]
pub enum RoundOutcome {
    Completed(Completion),
    /// The learner stopped before the end of the line.
    Abandoned,
    /// The session was asked for something out of order; the round was
    /// dropped without touching any statistics.
    Reset(SessionError),
}

/// Drives a [`TrainingSession`] through rounds, the learner playing one side.
pub struct RoundDriver<'s> {
    session: &'s mut TrainingSession,
    learner: Orientation,
}

impl<'s> RoundDriver<'s> {
    pub fn new(session: &'s mut TrainingSession, learner: Orientation) -> Self {
        Self { session, learner }
    }

    fn learner_to_move(&self, position: &str) -> bool {
        side_to_move(position) == Some(self.learner)
    }

    /// Play one round from the start position.
    ///
    /// Only fatal errors are returned; precondition violations end the round
    /// as [`RoundOutcome::Reset`].
    pub fn play(&mut self, source: &mut dyn MoveSource) -> Result<RoundOutcome, SessionError> {
        self.session.reset_round();
        let mut position = self.session.start_position();
        let mut ply = 0;

        loop {
            if self.learner_to_move(&position) {
                let hints = self.session.annotations(&position);
                if !hints.is_empty() {
                    source.notify(RoundEvent::Hints(&hints));
                }

                let Some(input) = source.next_move(&position, ply) else {
                    self.session.reset_round();
                    return Ok(RoundOutcome::Abandoned);
                };

                let outcome = match self.session.rules().parse_move(&position, input.trim())? {
                    Some(mv) => {
                        self.session
                            .attempt_move(&position, ply, &mv.from, &mv.to, mv.promotion)?
                    }
                    None => MoveOutcome::Invalid,
                };

                match outcome {
                    MoveOutcome::Invalid => {
                        self.session.mark_error(&position);
                        source.notify(RoundEvent::Rejected { input: &input });
                    }
                    MoveOutcome::Continue { position: next, .. } => {
                        position = next;
                        ply += 1;
                    }
                    MoveOutcome::EndOfVariant { position: next, .. } => {
                        return self.finish(&next, source);
                    }
                }
            } else {
                let mv = match self.session.select_next_move(&position, ply) {
                    Ok(mv) => mv,
                    Err(e) => return self.recover(e),
                };
                let next = self.session.rules().play(&position, &mv)?;
                source.notify(RoundEvent::OpponentMoved {
                    mv: &mv,
                    position: &next,
                });
                position = next;
                ply += 1;

                if self.session.is_end_of_variant(&position, ply) {
                    return self.finish(&position, source);
                }
            }
        }
    }

    fn finish(
        &mut self,
        position: &str,
        source: &mut dyn MoveSource,
    ) -> Result<RoundOutcome, SessionError> {
        match self.session.complete_variant(position) {
            Ok(completion) => {
                source.notify(RoundEvent::Completed(&completion));
                Ok(RoundOutcome::Completed(completion))
            }
            Err(e) => self.recover(e),
        }
    }

    fn recover(&mut self, error: SessionError) -> Result<RoundOutcome, SessionError> {
        if !error.is_precondition() {
            return Err(error);
        }
        warn!(%error, "round dropped");
        self.session.reset_round();
        Ok(RoundOutcome::Reset(error))
    }
}
