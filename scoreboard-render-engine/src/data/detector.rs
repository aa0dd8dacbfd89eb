use std::collections::{HashSet, VecDeque};

use bevy::prelude::*;

use super::schema::{Submission, SubmissionKey};

/// Upper bound on submissions held back while the history is missing.
/// Past it the oldest are dropped; the next poll after seeding still
/// reports every correct submission the server knows about.
pub const MAX_DEFERRED: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Correct and never seen before: animate it.
    New,
    AlreadySeen,
    /// Not a correct submission.
    NotApplicable,
}

/// Remembers every correct submission the scene has already accounted
/// for. The set only grows.
///
/// Until the submission history has been loaded the detector is
/// unseeded; callers defer incoming submissions until [`seed`] has run
/// so that historic solves are never replayed as new ones.
///
/// [`seed`]: SolveDetector::seed
#[derive(Resource, Default, Debug)]
pub struct SolveDetector {
    seen: HashSet<SubmissionKey>,
    seeded: bool,
    deferred: VecDeque<Submission>,
}

impl SolveDetector {
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Mark every correct submission of the history as seen and hand
    /// back whatever was deferred while waiting for it.
    pub fn seed<'a>(&mut self, history: impl IntoIterator<Item = &'a Submission>) -> Vec<Submission> {
        for submission in history {
            if submission.is_correct() {
                self.seen.insert(submission.key());
            }
        }
        self.seeded = true;
        self.deferred.drain(..).collect()
    }

    pub fn defer(&mut self, submission: Submission) {
        if self.deferred.len() == MAX_DEFERRED {
            if let Some(dropped) = self.deferred.pop_front() {
                warn!(
                    "Deferred submission queue full, dropping {}",
                    dropped.key().as_str()
                );
            }
        }
        self.deferred.push_back(submission);
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Classify and, for `New`, record the submission.
    pub fn classify(&mut self, submission: &Submission) -> Classification {
        if !submission.is_correct() {
            return Classification::NotApplicable;
        }
        if self.seen.insert(submission.key()) {
            Classification::New
        } else {
            Classification::AlreadySeen
        }
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{AccountId, ChallengeId, SubmissionKind};

    fn submission(account: u64, challenge: u64, date: &str, kind: SubmissionKind) -> Submission {
        Submission {
            kind,
            account: AccountId(account),
            challenge_id: ChallengeId(challenge),
            date: date.into(),
            team: None,
            challenge: None,
        }
    }

    #[test]
    fn same_submission_is_new_only_once() {
        let mut detector = SolveDetector::default();
        detector.seed(&[]);
        let s = submission(1, 2, "t0", SubmissionKind::Correct);

        assert_eq!(detector.classify(&s), Classification::New);
        assert_eq!(detector.classify(&s), Classification::AlreadySeen);
        assert_eq!(detector.classify(&s.clone()), Classification::AlreadySeen);
        assert_eq!(detector.seen_len(), 1);
    }

    #[test]
    fn incorrect_submissions_are_not_applicable() {
        let mut detector = SolveDetector::default();
        let s = submission(1, 2, "t0", SubmissionKind::Other("incorrect".into()));
        assert_eq!(detector.classify(&s), Classification::NotApplicable);
        assert_eq!(detector.seen_len(), 0);
    }

    #[test]
    fn seeded_history_is_never_new() {
        let history = vec![
            submission(1, 2, "t0", SubmissionKind::Correct),
            submission(3, 2, "t1", SubmissionKind::Correct),
        ];
        let mut detector = SolveDetector::default();
        detector.seed(&history);

        assert!(detector.is_seeded());
        for s in &history {
            assert_eq!(detector.classify(s), Classification::AlreadySeen);
        }
        let later = submission(1, 2, "t2", SubmissionKind::Correct);
        assert_eq!(detector.classify(&later), Classification::New);
    }

    #[test]
    fn seeding_returns_deferred_submissions() {
        let mut detector = SolveDetector::default();
        detector.defer(submission(1, 2, "t0", SubmissionKind::Correct));
        detector.defer(submission(4, 2, "t1", SubmissionKind::Correct));

        let history = vec![submission(1, 2, "t0", SubmissionKind::Correct)];
        let released = detector.seed(&history);

        assert_eq!(released.len(), 2);
        assert_eq!(detector.deferred_len(), 0);
        assert_eq!(detector.classify(&released[0]), Classification::AlreadySeen);
        assert_eq!(detector.classify(&released[1]), Classification::New);
    }

    #[test]
    fn deferred_queue_drops_oldest_when_full() {
        let mut detector = SolveDetector::default();
        for n in 0..MAX_DEFERRED + 3 {
            detector.defer(submission(1, 2, &format!("t{n}"), SubmissionKind::Correct));
        }
        assert_eq!(detector.deferred_len(), MAX_DEFERRED);

        let released = detector.seed(&[]);
        assert_eq!(released.len(), MAX_DEFERRED);
        assert_eq!(released[0].date, "t3");
        assert_eq!(
            released[MAX_DEFERRED - 1].date,
            format!("t{}", MAX_DEFERRED + 2)
        );
    }
}
