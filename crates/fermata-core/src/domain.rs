use serde::Deserialize;

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Arrivals at a stop, as returned by `GET <base>/stop/<code>`.
///
/// An empty `name` means the stop does not exist, whatever `entries` holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StopRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "stops", deserialize_with = "null_as_default")]
    pub entries: Vec<StopEntry>,
}

/// One upcoming arrival, in backend order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StopEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub line: String,
    #[serde(rename = "dest", deserialize_with = "null_as_default")]
    pub destination: String,
    #[serde(rename = "time", deserialize_with = "null_as_default")]
    pub scheduled_time: String,
    #[serde(rename = "eta", deserialize_with = "null_as_default")]
    pub estimated_arrival: String,
}

/// Timetable of a line, as returned by `GET <base>/line/<code>`.
///
/// No directions means the line does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LineRecord {
    #[serde(rename = "lines", deserialize_with = "null_as_default")]
    pub directions: Vec<LineDirection>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LineDirection {
    #[serde(rename = "direction", deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub times: Vec<String>,
}

// The backend sends `null` for empty lists.
fn null_as_default<'de, D, T>(de: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}
