pub mod create_run_route;
pub mod stub_routes;
