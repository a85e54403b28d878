// Application layer - Use case interactors

pub mod codec_params_deriver;
pub mod container;
pub mod cut_point_resolver;
pub mod smart_cut_interactor;

// Re-export interactors
pub use codec_params_deriver::CodecParameterDeriver;
pub use container::{AppContainer, DefaultAppContainer};
pub use cut_point_resolver::CutPointResolver;
pub use smart_cut_interactor::{EncodePlan, SmartCutInteractor, SmartCutPlan, SmartCutRequest};
