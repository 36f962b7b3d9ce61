pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the handlers and middleware the server binary wires into
// the router.
pub use middleware::attach_session;
pub use rest::{
    create_material_handler, delete_material_handler, download_material_handler,
    list_materials_handler, update_material_handler,
};
