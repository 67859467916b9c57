//! Save and restore a single host text field around a host operation.

use crate::host::{FieldRef, TextField};

/// A captured field value waiting to be written back.
///
/// Created right before a host operation that may overwrite the field and
/// consumed exactly once afterwards, on the success and the failure path alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    field: FieldRef,
    /// `None` when the field was absent or unreadable at capture time.
    value: Option<String>,
    restored: bool,
}

impl InputSnapshot {
    /// Records the current value of `field`.
    ///
    /// Never fails: a missing field or a host error yields a snapshot whose
    /// restore is a no-op.
    pub async fn capture(fields: &dyn TextField, field: FieldRef) -> Self {
        let value = match fields.read_field(&field).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(field = %field, error = %e, "failed to capture input field");
                None
            }
        };

        if value.is_none() {
            tracing::debug!(field = %field, "input field absent at capture");
        }

        Self {
            field,
            value,
            restored: false,
        }
    }

    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Writes the captured value back and notifies observers.
    ///
    /// Idempotent. A field that disappeared in the meantime and any host error
    /// are logged and otherwise ignored.
    pub async fn restore(&mut self, fields: &dyn TextField) {
        if self.restored {
            return;
        }
        self.restored = true;

        let Some(value) = self.value.as_deref() else {
            return;
        };

        match fields.write_field(&self.field, value).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(field = %self.field, "input field gone, nothing to restore");
                return;
            }
            Err(e) => {
                tracing::warn!(field = %self.field, error = %e, "failed to restore input field");
                return;
            }
        }

        if let Err(e) = fields.notify_change(&self.field).await {
            tracing::warn!(field = %self.field, error = %e, "failed to notify input change");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeFields;

    #[tokio::test]
    async fn test_round_trip_restores_value() {
        let field = FieldRef::chat_input();
        let fields = FakeFields::with_value(&field, "hello");

        let mut snapshot = InputSnapshot::capture(&fields, field.clone()).await;
        fields.set(&field, "overwritten by host");
        snapshot.restore(&fields).await;

        assert_eq!(fields.get(&field).as_deref(), Some("hello"));
        assert_eq!(fields.notifications(), vec![field]);
    }

    #[tokio::test]
    async fn test_round_trip_with_empty_value() {
        let field = FieldRef::chat_input();
        let fields = FakeFields::with_value(&field, "");

        let mut snapshot = InputSnapshot::capture(&fields, field.clone()).await;
        fields.set(&field, "generated text");
        snapshot.restore(&fields).await;

        assert_eq!(fields.get(&field).as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_restore_is_idempotent() {
        let field = FieldRef::chat_input();
        let fields = FakeFields::with_value(&field, "draft");

        let mut snapshot = InputSnapshot::capture(&fields, field.clone()).await;
        snapshot.restore(&fields).await;
        fields.set(&field, "typed after restore");
        snapshot.restore(&fields).await;

        assert!(snapshot.is_restored());
        assert_eq!(fields.get(&field).as_deref(), Some("typed after restore"));
        assert_eq!(fields.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_restore_into_removed_field_is_silent() {
        let field = FieldRef::chat_input();
        let fields = FakeFields::with_value(&field, "draft");

        let mut snapshot = InputSnapshot::capture(&fields, field.clone()).await;
        fields.remove(&field);
        snapshot.restore(&fields).await;

        assert_eq!(fields.get(&field), None);
        assert!(fields.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_capture_with_unavailable_host() {
        let field = FieldRef::chat_input();
        let fields = FakeFields::with_value(&field, "draft");
        *fields.fail.lock().unwrap() = true;

        let mut snapshot = InputSnapshot::capture(&fields, field.clone()).await;
        assert_eq!(snapshot.value(), None);

        *fields.fail.lock().unwrap() = false;
        fields.set(&field, "changed");
        snapshot.restore(&fields).await;
        assert_eq!(fields.get(&field).as_deref(), Some("changed"));
    }
}
