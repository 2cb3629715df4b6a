table! {
    cards (id) {
        id -> Int4,
        user_id -> Int4,
        word -> Varchar,
        translation -> Varchar,
        example -> Nullable<Varchar>,
        level -> Int4,
        next_repeat -> Timestamptz,
        created_at -> Timestamptz,
    }
}

table! {
    passwords (id) {
        id -> Int4,
        password_hash -> Bytea,
        salt -> Bytea,
        initial_rounds -> Int2,
        extra_rounds -> Int2,
    }
}

table! {
    users (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        joined -> Timestamptz,
    }
}

joinable!(cards -> users (user_id));
joinable!(passwords -> users (id));

allow_tables_to_appear_in_same_query!(
    cards,
    passwords,
    users,
);
