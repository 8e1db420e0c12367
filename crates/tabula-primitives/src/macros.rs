#[macro_export]
macro_rules! data_type_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (
                Bool,
                Bool,
                label = "bool",
                fixed_width = 1,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = false
            ),
            (
                Int8,
                Int8,
                label = "int8",
                fixed_width = 1,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                Int16,
                Int16,
                label = "int16",
                fixed_width = 2,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                Int32,
                Int32,
                label = "int32",
                fixed_width = 4,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                Int64,
                Int64,
                label = "int64",
                fixed_width = 8,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                UnixtimeMicros,
                Int64,
                label = "unixtime_micros",
                fixed_width = 8,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                Date,
                Int32,
                label = "date",
                fixed_width = 4,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                Float,
                Float,
                label = "float",
                fixed_width = 4,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = false
            ),
            (
                Double,
                Double,
                label = "double",
                fixed_width = 8,
                is_variable_length = false,
                supports_ordering = true,
                is_keyable = false
            ),
            (
                String,
                Binary,
                label = "string",
                fixed_width = 4,
                is_variable_length = true,
                supports_ordering = true,
                is_keyable = true
            ),
            (
                Binary,
                Binary,
                label = "binary",
                fixed_width = 4,
                is_variable_length = true,
                supports_ordering = true,
                is_keyable = true
            ),
        }
    };
}

#[macro_export]
macro_rules! data_type_registry {
    ($macro:ident) => {
        $crate::data_type_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::data_type_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($data_type:ident, $physical:ident, label = $label:expr, fixed_width = $width:expr, is_variable_length = $is_varlen:expr, supports_ordering = $supports_ordering:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::DataType::$data_type => $crate::TypeMetadata {
                    physical: $crate::PhysicalType::$physical,
                    label: $label,
                    fixed_width: $width,
                    is_variable_length: $is_varlen,
                    supports_ordering: $supports_ordering,
                    is_keyable: $is_keyable,
                },
            )*
        }
    };
}

macro_rules! all_types_from_registry {
    ( @entries $( ($data_type:ident, $physical:ident, label = $label:expr, fixed_width = $width:expr, is_variable_length = $is_varlen:expr, supports_ordering = $supports_ordering:expr, is_keyable = $is_keyable:expr) ),* $(,)? ) => {
        [ $( $crate::DataType::$data_type ),* ]
    };
}
