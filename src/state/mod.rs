// State module - collected outcomes and their classification

pub mod result;

pub use result::{
    CollectReport, CollectionErrorRecord, Outcome, OutcomeRecord, Phase, XfailMarker,
};

use serde::Serialize;

/// Report category of a single outcome record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Passed,
    Failed,
    Skipped,
    ExpectedFailure,
    UnexpectedPass,
    CollectionError,
}

impl Category {
    /// Classify one record. The xfail marker is checked first because hosts
    /// may report expected failures with a skipped outcome.
    pub fn of(record: &OutcomeRecord) -> Self {
        if record.xfail.is_some() {
            return match record.outcome {
                Outcome::Passed => Self::UnexpectedPass,
                _ => Self::ExpectedFailure,
            };
        }

        match record.outcome {
            Outcome::Skipped => Self::Skipped,
            Outcome::Passed => Self::Passed,
            Outcome::Failed => Self::Failed,
        }
    }
}

/// Outcome records partitioned by category, each in collection order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classified {
    pub passed: Vec<OutcomeRecord>,
    pub failed: Vec<OutcomeRecord>,
    pub skipped: Vec<OutcomeRecord>,
    pub xfailed: Vec<OutcomeRecord>,
    pub xpassed: Vec<OutcomeRecord>,
    pub collection_errors: Vec<CollectionErrorRecord>,
}

impl Classified {
    /// Partition records using the fixed category precedence
    pub fn classify(
        records: impl IntoIterator<Item = OutcomeRecord>,
        collection_errors: Vec<CollectionErrorRecord>,
    ) -> Self {
        let mut classified = Self {
            collection_errors,
            ..Self::default()
        };

        for record in records {
            let bucket = match Category::of(&record) {
                Category::Passed => &mut classified.passed,
                Category::Failed => &mut classified.failed,
                Category::Skipped => &mut classified.skipped,
                Category::ExpectedFailure => &mut classified.xfailed,
                Category::UnexpectedPass => &mut classified.xpassed,
                Category::CollectionError => continue,
            };
            bucket.push(record);
        }

        classified
    }

    pub fn counts(&self) -> Counts {
        Counts {
            passed: self.passed.len(),
            failed: self.failed.len() + self.xpassed.len(),
            skipped: self.skipped.len(),
            xfailed: self.xfailed.len(),
        }
    }

    /// Whether the failures section has anything to show
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.xfailed.is_empty() || !self.xpassed.is_empty()
    }
}

/// Summary counts. Unexpected passes are folded into `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub xfailed: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.xfailed
    }
}
