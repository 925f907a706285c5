mod best;

pub use best::{BestCheckpoint, BestSelector, Candidate, Offer, SelectorConfig};
