use serde::Serialize;

pub trait Method {
    /// Appended to the client's base URL.
    const PATH: &'static str;

    type Response: serde::de::DeserializeOwned;
    type Params: Serialize;
}
