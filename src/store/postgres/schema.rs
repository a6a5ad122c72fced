//! Diesel schema for the user and task tables.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Four-digit passport series.
        #[max_length = 4]
        passport_series -> Varchar,
        /// Six-digit passport number.
        #[max_length = 6]
        passport_number -> Varchar,
        /// Family name.
        #[max_length = 255]
        surname -> Varchar,
        /// Given name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional patronymic.
        #[max_length = 255]
        patronymic -> Nullable<Varchar>,
        /// Postal address.
        address -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Time-tracked tasks; a null `end_time` marks the running task.
    tasks (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        /// Task name.
        #[max_length = 255]
        name -> Varchar,
        /// Tracked whole hours.
        hours -> Int8,
        /// Tracked minutes past the last whole hour.
        minutes -> Int8,
        /// Start of tracking.
        start_time -> Timestamptz,
        /// End of tracking.
        end_time -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, tasks);
