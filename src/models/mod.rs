// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Axis, CarRecord, CarSummary, CategoricalField, CategoryCount, ChartResult, EncodedOption,
    EncoderMap, ModelOption, NumericCount, PriceStats, UserAccount, YearPriceStats,
};
pub use requests::{
    CarListQuery, CreateUserRequest, FeatureValue, LoginRequest, ModelsByMakeQuery,
    PredictRequest, SimilarModelsQuery, UpdateUserRequest, UserListQuery,
};
pub use responses::{
    CarDetailData, CarListData, ChartTypesData, Envelope, ErrorBody, Factor, HealthResponse,
    MessageData, PredictionData, PriceRange, SimilarModelsData, UserDetailData, UserListData,
    UserMutationData,
};
