//! Request, response and span models

pub mod offsets;
pub mod pii_entity;
pub mod request;
pub mod response;

pub use offsets::CharIndex;
pub use pii_entity::{EntitySpan, ReplacedItem};
pub use request::{
    AnalyzeRequest, AnonymizeRequest, BatchAnonymizeRequest, DeanonymizeEntity,
    DeanonymizeRequest, DEFAULT_LANGUAGE, DEFAULT_SCORE_THRESHOLD,
};
pub use response::{
    AdvancedAnonymizeResponse, AnalysisDetails, AnalyzeResponse, AnonymizeResponse,
    BatchAnonymizeResponse, DeanonymizeResponse, EngineInfo,
};
