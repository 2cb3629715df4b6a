error_chain! {
    foreign_links {
        ParseBoolError(::std::str::ParseBoolError);
        VarError(::std::env::VarError);
        ParseIntError(::std::num::ParseIntError);
        StdIoError(::std::io::Error);
        DieselError(::diesel::result::Error);
        PoolError(::diesel::r2d2::PoolError);
        DieselMigrationError(::diesel_migrations::RunMigrationsError);
        JsonError(::serde_json::Error);
        DecodeError(::data_encoding::DecodeError);
        RandError(::rand::Error);
    }
    errors {
        InvalidInput {
            description("Provided input is invalid.")
            display("Provided input is invalid.")
        }
        NoSuchUser(email: String) {
            description("No such user exists")
            display("No user with e-mail address {} exists.", email)
        }
        EmailAddressTooLong {
            description("E-mail address too long")
            display("A valid e-mail address can be 254 characters at maximum.")
        }
        EmailAddressNotValid {
            description("E-mail address not valid")
            display("An e-mail address must contain the character '@'.")
        }
        EmailAddressAlreadyRegistered(email: String) {
            description("E-mail address already registered")
            display("A user with e-mail address {} already exists.", email)
        }
        PasswordTooShort {
            description("Password too short")
            display("A valid password must be at least 8 characters (bytes).")
        }
        PasswordTooLong {
            description("Password too long")
            display("A valid password must be at maximum 1024 characters (bytes).")
        }
        PasswordDoesntMatch {
            description("Password doesn't match")
            display("Password doesn't match.")
        }
        AuthError {
            description("Can't authenticate user")
            display("Username (= e-mail) or password doesn't match.")
        }
        BadToken {
            description("Malformed authentication token!")
            display("Malformed authentication token!")
        }
        LlmRequestFailed(status: u16, body: String) {
            description("The language model API returned an error")
            display("The language model API returned HTTP {}: {}", status, body)
        }
        LlmBadResponse(reason: &'static str) {
            description("The language model API returned something unexpected")
            display("The language model API returned something unexpected: {}", reason)
        }
        NoneResult {
            description("Option::None")
            display("Option::None")
        }
    }
}


#[test]
fn test_foreign_errors_convert() {
    let e: Error = "maybe".parse::<bool>().unwrap_err().into();
    match *e.kind() {
        ErrorKind::ParseBoolError(_) => (),
        ref other => panic!("Expected ParseBoolError, got {:?}", other),
    }
    let e: Error = ::diesel::result::Error::NotFound.into();
    match *e.kind() {
        ErrorKind::DieselError(::diesel::result::Error::NotFound) => (),
        ref other => panic!("Expected DieselError, got {:?}", other),
    }
}
