pub mod facefusion;
