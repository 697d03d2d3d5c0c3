pub mod coordinate_handler;

pub use coordinate_handler::{
    __path_create_coordinate, __path_delete_coordinate, __path_get_coordinate,
    __path_list_coordinates, __path_update_coordinate, create_coordinate, delete_coordinate,
    get_coordinate, list_coordinates, update_coordinate,
};
