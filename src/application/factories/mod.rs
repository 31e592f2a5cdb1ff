/// Factories for selecting adapter implementations at runtime
pub mod formatter_factory;
pub mod presenter_factory;

pub use formatter_factory::FormatterFactory;
pub use presenter_factory::PresenterFactory;
