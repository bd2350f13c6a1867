// Domain model: URI templates and the HAL resources that link through them

pub mod hal;
pub mod template;
