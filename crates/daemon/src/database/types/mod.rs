mod duuid;

pub use duuid::DUuid;
