use serde::Serialize;

use crate::classifier::{self, ClassifierConfig, Verdict};
use crate::record::MatchRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRecord {
    pub record: MatchRecord,
    pub verdict: Verdict,
    pub pattern_matched: bool,
}

/// All classified records of a tick in input order, plus indices of the ones
/// that matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    all: Vec<ClassifiedRecord>,
    matched_idx: Vec<usize>,
}

impl Batch {
    pub fn all(&self) -> &[ClassifiedRecord] {
        &self.all
    }

    pub fn matched(&self) -> impl Iterator<Item = &ClassifiedRecord> {
        self.matched_idx.iter().map(|&idx| &self.all[idx])
    }

    pub fn matched_count(&self) -> usize {
        self.matched_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

pub fn classify_batch(records: &[MatchRecord], config: &ClassifierConfig) -> Batch {
    let mut batch = Batch {
        all: Vec::with_capacity(records.len()),
        matched_idx: Vec::new(),
    };
    for record in records {
        let verdict = classifier::evaluate(record, config);
        let pattern_matched = verdict.matched();
        if pattern_matched {
            batch.matched_idx.push(batch.all.len());
        }
        batch.all.push(ClassifiedRecord {
            record: record.clone(),
            verdict,
            pattern_matched,
        });
    }
    batch
}
