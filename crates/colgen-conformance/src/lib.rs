//! Encoders generated at build time from `schemas/*.json`, one module per table.

pub mod enums {
    include!(concat!(env!("OUT_DIR"), "/enums.rs"));
}

pub mod events {
    include!(concat!(env!("OUT_DIR"), "/events.rs"));
}

pub mod nulls {
    include!(concat!(env!("OUT_DIR"), "/nulls.rs"));
}

pub mod probes {
    include!(concat!(env!("OUT_DIR"), "/probes.rs"));
}

pub mod scalars {
    include!(concat!(env!("OUT_DIR"), "/scalars.rs"));
}

pub mod text {
    include!(concat!(env!("OUT_DIR"), "/text.rs"));
}

pub mod wrapped {
    include!(concat!(env!("OUT_DIR"), "/wrapped.rs"));
}
