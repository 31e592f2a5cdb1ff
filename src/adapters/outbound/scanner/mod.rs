pub mod gradle_scanner;
pub mod maven_resolver;
pub mod maven_scanner;
pub mod project_scanner;

pub use gradle_scanner::GradleScanner;
pub use maven_resolver::MavenResolver;
pub use maven_scanner::MavenScanner;
pub use project_scanner::ProjectScanner;
