/// Scenario adjustment of raw model output.
pub mod adjust;
/// Future regressor rows fed to the demand model.
pub mod features;
pub mod model;
/// Headline metrics derived from the adjusted forecast.
pub mod summary;
