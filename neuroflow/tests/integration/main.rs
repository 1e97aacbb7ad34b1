// Integration tests follow the organization suggested by Matklad:
// https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod event_scheduling;
mod module_aliasing;
mod module_namespace;
mod port_callbacks;
mod sync_propagation;
mod time_monotonicity;
mod token_gating;
