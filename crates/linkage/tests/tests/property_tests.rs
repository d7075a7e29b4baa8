#[path = "property/idempotence.rs"]
mod idempotence;

#[path = "property/self_loop.rs"]
mod self_loop;

#[path = "property/mirror_symmetry.rs"]
mod mirror_symmetry;
