/// Declares a closed enum over concrete signal types, with `From` impls and
/// the signal operations every variant shares.
macro_rules! signal_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($variant),)+
        }

        impl $name {
            /// The discriminator of the wrapped signal.
            #[must_use]
            pub fn signal_type(&self) -> &'static str {
                match self {
                    $(Self::$variant(s) => $crate::signal::Signal::signal_type(s),)+
                }
            }

            #[must_use]
            pub fn headers(&self) -> &$crate::headers::Headers {
                match self {
                    $(Self::$variant(s) => $crate::signal::Signal::headers(s),)+
                }
            }

            /// Returns a copy carrying `headers`.
            #[must_use]
            pub fn set_headers(&self, headers: $crate::headers::Headers) -> Self {
                match self {
                    $(Self::$variant(s) => Self::$variant($crate::signal::Signal::set_headers(s, headers)),)+
                }
            }

            #[must_use]
            pub fn resource_path(&self) -> twinproto_types::JsonPointer {
                match self {
                    $(Self::$variant(s) => $crate::signal::Signal::resource_path(s),)+
                }
            }

            #[must_use]
            pub fn implemented_schema_version(&self) -> twinproto_types::SchemaVersion {
                match self {
                    $(Self::$variant(s) => $crate::signal::Signal::implemented_schema_version(s),)+
                }
            }

            /// The versions the wrapped signal's type exists in.
            #[must_use]
            pub fn supported_versions(&self) -> &'static [twinproto_types::SchemaVersion] {
                match self {
                    $(Self::$variant(_) => <$variant as $crate::signal::Signal>::SUPPORTED_VERSIONS,)+
                }
            }

            pub fn to_json(
                &self,
                version: twinproto_types::SchemaVersion,
                predicate: &dyn Fn(&twinproto_types::JsonFieldDefinition) -> bool,
            ) -> $crate::error::SignalResult<twinproto_types::JsonObject> {
                match self {
                    $(Self::$variant(s) => $crate::signal::Signal::to_json(s, version, predicate),)+
                }
            }

            pub fn to_json_default(&self) -> $crate::error::SignalResult<twinproto_types::JsonObject> {
                match self {
                    $(Self::$variant(s) => $crate::signal::Signal::to_json_default(s),)+
                }
            }
        }

        $(
            impl From<$variant> for $name {
                fn from(signal: $variant) -> Self {
                    Self::$variant(signal)
                }
            }
        )+
    };
}
