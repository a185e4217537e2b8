use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeviceError {
    #[error("device {hardware_id} unreachable: {reason}")]
    Unreachable { hardware_id: String, reason: String },
    #[error("device {hardware_id} rejected the command: {reason}")]
    Rejected { hardware_id: String, reason: String },
}
