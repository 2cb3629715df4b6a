use super::*;
use diesel::Connection as _;
use std::time::Duration;

pub const MAX_EMAIL_LEN: usize = 254;

pub fn get_user(conn: &PgConnection, user_id: i32) -> Result<Option<User>> {
    use schema::users;

    Ok(users::table
        .filter(users::id.eq(user_id))
        .get_result(conn)
        .optional()?)
}

pub fn get_user_by_email(conn: &PgConnection, user_email: &str) -> Result<Option<User>> {
    use schema::users;

    Ok(users::table
        .filter(users::email.eq(user_email))
        .get_result(conn)
        .optional()?)
}

pub fn get_all(conn: &PgConnection) -> Result<Vec<User>> {
    use schema::users;

    Ok(users::table
        .order(users::id.asc())
        .get_results(conn)?)
}

fn get_user_pass_by_email(conn: &PgConnection, user_email: &str) -> Result<(User, Password)> {
    use schema::{users, passwords};
    use diesel::result::Error::NotFound;

    users::table
        .inner_join(passwords::table)
        .filter(users::email.eq(user_email))
        .first(conn)
        .map_err(|e| match e {
            NotFound => Error::from_kind(ErrorKind::NoSuchUser(user_email.into())),
            e => Error::with_chain(e, "Error when trying to retrieve user!"),
        })
}

pub fn auth_user(conn: &PgConnection,
                 email: &str,
                 plaintext_pw: &str,
                 pepper: &[u8])
                 -> Result<Option<User>> {
    let (user, hashed_pw_from_db) = match get_user_pass_by_email(conn, email) {
        Err(err) => match err.kind() {
            ErrorKind::NoSuchUser(_) => return Ok(None),
            _ => Err(err),
        },
        ok => ok,
    }?;

    match password::check_password(plaintext_pw, hashed_pw_from_db.into(), pepper) {
        Err(err) => match err.kind() {
            ErrorKind::PasswordDoesntMatch => return Ok(None),
            _ => Err(err),
        },
        ok => ok,
    }?;

    Ok(Some(user))
}

/// Checks the fields of a sign-up before touching the database.
pub fn validate_new_user(name: &str, email: &str, plaintext_pw: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!(ErrorKind::InvalidInput);
    };
    if email.len() > MAX_EMAIL_LEN {
        bail!(ErrorKind::EmailAddressTooLong);
    };
    if !email.contains('@') {
        bail!(ErrorKind::EmailAddressNotValid);
    };
    password::check_length(plaintext_pw)
}

pub fn add_user(conn: &PgConnection,
                name: &str,
                email: &str,
                plaintext_pw: &str,
                pepper: &[u8],
                stretch_time: Duration)
                -> Result<User> {
    use schema::{users, passwords};

    let name = name.trim();
    let email = email.trim();
    validate_new_user(name, email, plaintext_pw)?;

    let pw = password::set_password(plaintext_pw, pepper, stretch_time)?;

    conn.transaction(|| {
        if get_user_by_email(conn, email)?.is_some() {
            bail!(ErrorKind::EmailAddressAlreadyRegistered(email.into()));
        }

        let user: User = diesel::insert_into(users::table)
            .values(&NewUser { name, email })
            .get_result(conn)
            .chain_err(|| "Couldn't create a new user!")?;

        diesel::insert_into(passwords::table)
            .values(&pw.into_db(user.id))
            .execute(conn)
            .chain_err(|| "Couldn't insert the new password into database!")?;

        info!("Created a new user, with email {:?}.", email);
        Ok(user)
    })
}

pub fn change_password(conn: &PgConnection,
                       user_email: &str,
                       new_password: &str,
                       pepper: &[u8],
                       stretch_time: Duration)
                       -> Result<User> {

    let user = get_user_by_email(conn, user_email)?
        .ok_or_else(|| ErrorKind::NoSuchUser(user_email.into()))?;

    let pw = password::set_password(new_password, pepper, stretch_time)
        .chain_err(|| "Setting password didn't succeed!")?;

    let _: Password = pw.into_db(user.id).save_changes(conn)?;

    info!("Changed the password of user {}.", user.id);
    Ok(user)
}


#[test]
fn test_validate_new_user() {
    assert!(validate_new_user("Ana", "ana@example.com", "contraseña").is_ok());

    match validate_new_user("  ", "ana@example.com", "contraseña") {
        Err(Error(ErrorKind::InvalidInput, _)) => (),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
    match validate_new_user("Ana", "ana.example.com", "contraseña") {
        Err(Error(ErrorKind::EmailAddressNotValid, _)) => (),
        other => panic!("Expected EmailAddressNotValid, got {:?}", other),
    }
    let long_email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
    match validate_new_user("Ana", &long_email, "contraseña") {
        Err(Error(ErrorKind::EmailAddressTooLong, _)) => (),
        other => panic!("Expected EmailAddressTooLong, got {:?}", other),
    }
    match validate_new_user("Ana", "ana@example.com", "1234") {
        Err(Error(ErrorKind::PasswordTooShort, _)) => (),
        other => panic!("Expected PasswordTooShort, got {:?}", other),
    }
}
