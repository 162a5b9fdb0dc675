//! Sell step names, used as `step` fields in logs.

/// Step: Check the order against the sell rules.
pub const STEP_VALIDATE: &str = "validate";

/// Step: Stage the order and its items inside the store transaction.
pub const STEP_SAVE_ORDER: &str = "save_order";

/// Step: Commit the store transaction.
pub const STEP_COMMIT: &str = "commit";

/// Step: Charge the order's payment instructions.
pub const STEP_PROCESS_PAYMENTS: &str = "process_payments";

/// Step: Move the stored order to confirmed.
pub const STEP_CONFIRM_ORDER: &str = "confirm_order";

/// Step: Send the confirmation e-mail.
pub const STEP_SEND_CONFIRMATION: &str = "send_confirmation";
