//! sea-orm entities owned by the api service.

pub mod users;
