mod coordinate_service;

pub use coordinate_service::CoordinateService;
