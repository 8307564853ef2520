pub mod dtos;
pub mod repository;

pub use dtos::{
    ClassifyRequest, CreateEventRequest, EventPatch, EventRecord, EventResponse, ExtractRequest,
    ExtractResponse, NewEvent, TagEntry,
};
pub use repository::{EventRepository, MemoryEventRepository};

#[cfg(test)]
pub use repository::MockEventRepository;
