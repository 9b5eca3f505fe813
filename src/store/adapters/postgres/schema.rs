//! Diesel schema for the coordination tables.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        display_name -> Varchar,
        /// Unique login email.
        #[max_length = 255]
        email -> Varchar,
        /// PHC password hash.
        #[max_length = 255]
        password_hash -> Varchar,
        /// `false` when frozen.
        is_active -> Bool,
        /// Superuser flag.
        is_superuser -> Bool,
        /// Signup timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Collaboration groups.
    groups (id) {
        /// Group identifier.
        id -> Uuid,
        /// Group name.
        #[max_length = 100]
        name -> Varchar,
        /// Optional Slack bot token.
        #[max_length = 255]
        slack_bot_token -> Nullable<Varchar>,
        /// Optional Slack channel identifier.
        #[max_length = 255]
        slack_channel_id -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-to-group join records.
    memberships (id) {
        /// Membership identifier.
        id -> Uuid,
        /// Member.
        user_id -> Uuid,
        /// Group.
        group_id -> Uuid,
        /// Admin flag.
        is_admin -> Bool,
        /// Acceptance flag.
        accepted -> Bool,
        /// Request or creation timestamp.
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dated group tasks and events.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning group.
        group_id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Calendar day.
        date -> Date,
        /// Optional start.
        starts_at -> Nullable<Timestamp>,
        /// Optional end.
        ends_at -> Nullable<Timestamp>,
        /// Optional place.
        #[max_length = 255]
        location -> Nullable<Varchar>,
        /// Optional description.
        description -> Nullable<Text>,
        /// Deadline-bearing flag.
        is_task -> Bool,
        /// Free-text workflow label.
        #[max_length = 255]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sparse per-(task, user) assignment, reaction and comment.
    task_relations (id) {
        /// Relation identifier.
        id -> Uuid,
        /// Task side.
        task_id -> Uuid,
        /// User side.
        user_id -> Uuid,
        /// Responsibility flag.
        is_assigned -> Bool,
        /// Reaction wire value.
        #[max_length = 20]
        reaction -> Varchar,
        /// Optional comment.
        comment -> Nullable<Text>,
    }
}

diesel::table! {
    /// Task presets.
    task_templates (id) {
        /// Template identifier.
        id -> Uuid,
        /// Owning group.
        group_id -> Uuid,
        /// Management label.
        #[max_length = 255]
        name -> Varchar,
        /// Default title.
        #[max_length = 255]
        title -> Varchar,
        /// Default location.
        #[max_length = 255]
        location -> Nullable<Varchar>,
        /// Default description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(memberships -> users (user_id));
diesel::joinable!(memberships -> groups (group_id));
diesel::joinable!(tasks -> groups (group_id));
diesel::joinable!(task_relations -> tasks (task_id));
diesel::joinable!(task_relations -> users (user_id));
diesel::joinable!(task_templates -> groups (group_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    groups,
    memberships,
    tasks,
    task_relations,
    task_templates,
);
