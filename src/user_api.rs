use super::*;
use pencil::{jsonify, redirect};
use pencil::datastructures::MultiDict;
use tarjeta_backend::errors::ErrorKind;
use tarjeta_backend::models::UserInfo;
use tarjeta_backend::user;

#[derive(Debug, PartialEq)]
struct SignUp {
    name: String,
    email: String,
    password: String,
}

fn form_field(form: &MultiDict<String>, key: &str) -> String {
    form.get::<str>(key).unwrap_or_default().to_string()
}

/// `None` if any of the fields is missing or blank.
fn sign_up_form(form: &MultiDict<String>) -> Option<SignUp> {
    let sign_up = SignUp {
        name: form_field(form, "name"),
        email: form_field(form, "email"),
        password: form_field(form, "password"),
    };
    if sign_up.name.trim().is_empty() || sign_up.email.trim().is_empty() || sign_up.password.is_empty() {
        return None;
    }
    Some(sign_up)
}

fn login_form(form: &MultiDict<String>) -> Option<(String, String)> {
    let email = form_field(form, "email");
    let plaintext_pw = form_field(form, "password");
    if email.is_empty() || plaintext_pw.is_empty() {
        return None;
    }
    Some((email, plaintext_pw))
}

pub fn create_user(req: &mut Request) -> PencilResult {

    let SignUp { name, email, password: plaintext_pw } =
        err_400!(sign_up_form(req.form()), "Missing required fields");

    let conn = db_connect().err_500()?;

    match user::add_user(&conn,
                         &name,
                         &email,
                         &plaintext_pw,
                         &*RUNTIME_PEPPER,
                         *PASSWORD_STRETCHING_TIME) {
        Ok(_) => redirect("/login.html", 303),
        Err(e) => match *e.kind() {
            ErrorKind::InvalidInput |
            ErrorKind::EmailAddressTooLong |
            ErrorKind::EmailAddressNotValid |
            ErrorKind::EmailAddressAlreadyRegistered(_) |
            ErrorKind::PasswordTooShort |
            ErrorKind::PasswordTooLong => Ok(bad_request(e)),
            _ => {
                error!("Error creating user: {:?}", e);
                json_error(500, "Failed to create user")
            }
        },
    }
}

pub fn login(req: &mut Request) -> PencilResult {

    let (email, plaintext_pw) = err_400!(login_form(req.form()), "Missing required fields");
    if email.len() > user::MAX_EMAIL_LEN || plaintext_pw.len() > tarjeta_backend::password::MAX_PASSWORD_LEN {
        return Ok(bad_request("Too long email/password."));
    }

    let conn = try_500!(db_connect(), "Failed to login user");

    match do_login(&conn, email.trim(), &plaintext_pw)? {
        Some((user, auth_token)) => {
            info!("User {} logged in.", user.id);
            redirect("/index.html", 303).set_auth_cookie(&auth_token)
        }
        None => {
            warn!("Failed login: {}", &email);
            text_response(401, "Invalid credentials")
        }
    }
}

pub fn logout(_: &mut Request) -> PencilResult {
    redirect("/index.html", 303).expire_cookie()
}

pub fn current_user(req: &mut Request) -> PencilResult {
    let (_, user) = auth_user(req)?;

    jsonify(&UserInfo::from(user))
}


#[cfg(test)]
fn form_of(fields: &[(&str, &str)]) -> MultiDict<String> {
    let mut form = MultiDict::new();
    for &(k, v) in fields {
        form.add(k.to_string(), v.to_string());
    }
    form
}

#[test]
fn test_sign_up_form() {
    let form = form_of(&[("name", "Ana"), ("email", "ana@example.com"), ("password", "hunter22")]);
    assert_eq!(sign_up_form(&form),
               Some(SignUp {
                   name: "Ana".to_string(),
                   email: "ana@example.com".to_string(),
                   password: "hunter22".to_string(),
               }));
}

#[test]
fn test_sign_up_form_missing_fields() {
    assert_eq!(sign_up_form(&form_of(&[])), None);
    assert_eq!(sign_up_form(&form_of(&[("email", "ana@example.com"), ("password", "hunter22")])), None);
    assert_eq!(sign_up_form(&form_of(&[("name", "  "), ("email", "ana@example.com"), ("password", "hunter22")])),
               None);
    assert_eq!(sign_up_form(&form_of(&[("name", "Ana"), ("email", "ana@example.com")])), None);
}

#[test]
fn test_login_form() {
    assert_eq!(login_form(&form_of(&[("email", "ana@example.com"), ("password", "hunter22")])),
               Some(("ana@example.com".to_string(), "hunter22".to_string())));
    assert_eq!(login_form(&form_of(&[("email", "ana@example.com")])), None);
    assert_eq!(login_form(&form_of(&[("password", "hunter22")])), None);
    assert_eq!(login_form(&form_of(&[("email", ""), ("password", "hunter22")])), None);
}
