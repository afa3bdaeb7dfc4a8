use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::error::Error;

use serde::Serialize;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::json::render_json;
use crate::message::{
    BoolValue, BytesValue, DoubleValue, DynamicMessage, FloatValue, Int32Value, Int64Value,
    MapValue, Message, StringValue,
};
use crate::throwable::ThrowableProto;

type Converter = Box<dyn Fn(&dyn Any) -> Result<Option<Message>> + Send + Sync>;

struct Registration {
    type_name: &'static str,
    convert: Converter,
}

/// Type-keyed registry of message types admitted onto the wire.
pub struct MessageRegistry {
    entries: HashMap<TypeId, Registration>,
    config: RegistryConfig,
}

impl MessageRegistry {
    /// Registry with every wrapper type and the throwable message registered.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Registry with built-in types and explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut registry = Self::empty_with_config(config);
        registry.register::<BoolValue>();
        registry.register::<Int32Value>();
        registry.register::<Int64Value>();
        registry.register::<FloatValue>();
        registry.register::<DoubleValue>();
        registry.register::<StringValue>();
        registry.register::<BytesValue>();
        registry.register::<MapValue>();
        registry.register::<ThrowableProto>();
        registry.register::<Message>();
        registry
    }

    /// Registry that admits nothing until types are registered.
    pub fn empty() -> Self {
        Self::empty_with_config(RegistryConfig::default())
    }

    pub fn empty_with_config(config: RegistryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Admit a type that converts into one of the built-in message variants.
    pub fn register<T>(&mut self)
    where
        T: Any + Clone + Into<Message>,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Registration {
                type_name: type_name::<T>(),
                convert: Box::new(|value: &dyn Any| -> Result<Option<Message>> {
                    Ok(value.downcast_ref::<T>().cloned().map(Into::into))
                }),
            },
        );
    }

    /// Admit an arbitrary serde type, rendered under `message_name`.
    pub fn register_serde<T>(&mut self, message_name: &'static str)
    where
        T: Any + Serialize,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Registration {
                type_name: message_name,
                convert: Box::new(move |value: &dyn Any| -> Result<Option<Message>> {
                    let Some(value) = value.downcast_ref::<T>() else {
                        return Ok(None);
                    };
                    Ok(Some(Message::Dynamic(DynamicMessage {
                        type_id: TypeId::of::<T>(),
                        type_name: message_name,
                        body: serde_json::to_value(value)?,
                    })))
                }),
            },
        );
    }

    /// Check whether `T` is a registered message type.
    pub fn is_supported<T: Any>(&self) -> bool {
        self.is_supported_id(TypeId::of::<T>())
    }

    pub fn is_supported_id(&self, id: TypeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Name a type was registered under.
    pub fn registered_name(&self, id: TypeId) -> Option<&'static str> {
        self.entries.get(&id).map(|entry| entry.type_name)
    }

    /// Convert a registered value into a message.
    pub fn to_message<T: Any>(&self, value: &T) -> Result<Message> {
        let unregistered = || SchemaError::Unregistered {
            type_name: type_name::<T>(),
        };

        let Some(entry) = self.entries.get(&TypeId::of::<T>()) else {
            debug!(type_name = type_name::<T>(), "rejecting unregistered message type");
            return Err(unregistered());
        };

        (entry.convert)(value)?.ok_or_else(unregistered)
    }

    /// Check that an already built message belongs to a registered type.
    pub fn ensure_supported(&self, message: &Message) -> Result<()> {
        if self.is_supported_id(message.payload_type_id()) {
            return Ok(());
        }
        debug!(
            type_name = message.type_name(),
            "rejecting unregistered message type"
        );
        Err(SchemaError::Unregistered {
            type_name: message.type_name(),
        })
    }

    /// Render a message as one line of compact JSON.
    pub fn render_json(&self, message: &Message) -> Result<String> {
        render_json(message)
    }

    /// Normalize an error into the generic throwable message.
    pub fn throwable_from_error<E: Error + 'static>(&self, err: &E) -> ThrowableProto {
        ThrowableProto::from_error(err, self.cause_depth())
    }

    /// Normalize a type-erased error into the generic throwable message.
    pub fn throwable_from_dyn_error(&self, err: &(dyn Error + 'static)) -> ThrowableProto {
        ThrowableProto::from_dyn_error(err, self.cause_depth())
    }

    fn cause_depth(&self) -> usize {
        if self.config.capture_cause_chain {
            self.config.max_cause_depth
        } else {
            0
        }
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.entries.values().map(|entry| entry.type_name).collect();
        names.sort_unstable();
        f.debug_struct("MessageRegistry")
            .field("types", &names)
            .field("config", &self.config)
            .finish()
    }
}
