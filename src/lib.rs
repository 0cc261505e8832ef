pub mod aggregate;
pub mod distribution;
pub mod export;
pub mod ingest;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod rank;
pub mod replay;
pub mod similarity;
pub mod whatif;
