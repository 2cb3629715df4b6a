use super::errors::*;
use super::models::Password;
use std::time::{Instant, Duration};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 1024;
const INITIAL_ROUNDS: i16 = 10;

#[derive(Clone, Copy, Debug)]
pub struct HashedPassword {
    hash: [u8; 24],
    salt: [u8; 16],
    initial_rounds: i16,
    extra_rounds: i16,
}

impl From<Password> for HashedPassword {
    fn from(db_password: Password) -> Self {
        let mut hash = [0_u8; 24];
        let mut salt = [0_u8; 16];
        hash[..].clone_from_slice(&db_password.password_hash[..]);
        salt[..].clone_from_slice(&db_password.salt[..]);
        HashedPassword {
            hash,
            salt,
            initial_rounds: db_password.initial_rounds,
            extra_rounds: db_password.extra_rounds,
        }
    }
}


impl HashedPassword {
    pub fn into_db(self, user_id: i32) -> Password {
        Password {
            id: user_id,
            password_hash: (&self.hash[..]).into(),
            salt: (&self.salt[..]).into(),
            initial_rounds: self.initial_rounds,
            extra_rounds: self.extra_rounds,
        }
    }
}

fn pepper_salt_pw_hash(plaintext_pw: &str,
                       salt: [u8; 16],
                       initial_rounds: i16,
                       pepper: &[u8])
                       -> HashedPassword {
    use crypto::bcrypt::bcrypt;
    use crypto::sha2;
    use crypto::digest::Digest;

    // bcrypt only looks at the first 72 bytes, so the password is pre-hashed.
    let mut hasher = sha2::Sha512::new();
    hasher.input_str(plaintext_pw);
    hasher.input(pepper);
    let mut peppered_pw = [0_u8; 64];
    hasher.result(&mut peppered_pw);

    let mut output_hash = [0_u8; 24];
    bcrypt(initial_rounds as u32, &salt, &peppered_pw, &mut output_hash);
    HashedPassword {
        hash: output_hash,
        salt,
        initial_rounds,
        extra_rounds: 0,
    }
}

pub fn check_length(plaintext_pw: &str) -> Result<()> {
    if plaintext_pw.len() < MIN_PASSWORD_LEN {
        bail!(ErrorKind::PasswordTooShort);
    };
    if plaintext_pw.len() > MAX_PASSWORD_LEN {
        bail!(ErrorKind::PasswordTooLong);
    };
    Ok(())
}

/// Hashes with a fresh salt, increasing the bcrypt cost until a single hash
/// takes at least `stretch_time`.
pub fn set_password(plaintext_pw: &str,
                    pepper: &[u8],
                    stretch_time: Duration)
                    -> Result<HashedPassword> {
    use rand::RngCore;
    use rand::rngs::OsRng;

    check_length(plaintext_pw)?;

    let mut salt = [0_u8; 16];
    OsRng.try_fill_bytes(&mut salt)
        .chain_err(|| "Unable to connect to the system random number generator!")?;

    let mut rounds = INITIAL_ROUNDS;
    let start_time = Instant::now();
    let mut hashed_pw = pepper_salt_pw_hash(plaintext_pw, salt, rounds, pepper);
    let mut elapsed = start_time.elapsed();

    while elapsed < stretch_time && rounds < 31 {

        debug!("Not enough time elapsed ({:?}). Stretching more.", elapsed);
        rounds += 1;
        let start_time = Instant::now();
        hashed_pw = pepper_salt_pw_hash(plaintext_pw, salt, rounds, pepper);
        elapsed = start_time.elapsed();

    }

    Ok(hashed_pw)
}

pub fn stretch_password(strength_goal: i16, hashed_pw: HashedPassword) -> HashedPassword {
    use crypto::bcrypt::bcrypt;

    // We can regard the password hash as the output of the original creation function.
    let mut output_hash = hashed_pw.hash;
    let mut extra_rounds = hashed_pw.extra_rounds;

    while hashed_pw.initial_rounds + extra_rounds < strength_goal {
        let input = output_hash;
        bcrypt((hashed_pw.initial_rounds + extra_rounds) as u32,
               &hashed_pw.salt,
               &input,
               &mut output_hash);
        extra_rounds += 1;
    }
    HashedPassword {
        hash: output_hash,
        salt: hashed_pw.salt,
        initial_rounds: hashed_pw.initial_rounds,
        extra_rounds,
    }
}

pub fn check_password(plaintext_pw: &str, pw_from_db: HashedPassword, pepper: &[u8]) -> Result<()> {
    use crypto::util::fixed_time_eq;
    let init_hash = pepper_salt_pw_hash(plaintext_pw,
                                        pw_from_db.salt,
                                        pw_from_db.initial_rounds,
                                        pepper);
    let stretched_pw = stretch_password(pw_from_db.initial_rounds + pw_from_db.extra_rounds,
                                        init_hash);

    if fixed_time_eq(&stretched_pw.hash, &pw_from_db.hash) {
        Ok(())
    } else {
        Err(ErrorKind::PasswordDoesntMatch.into())
    }
}


#[cfg(test)]
fn test_pepper() -> [u8; 32] {
    use rand::RngCore;
    let mut pepper = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut pepper);
    pepper
}

#[test]
fn test_set_check_password1() {
    let pepper = test_pepper();
    let pw = set_password("password", &pepper, Duration::from_millis(0)).unwrap();
    check_password("password", pw, &pepper).expect("Passwords should match!");
}

#[test]
fn test_set_check_password2() {
    let pepper = test_pepper();
    let pw = set_password("password1", &pepper, Duration::from_millis(0)).unwrap();
    if let Ok(()) = check_password("password2", pw, &pepper) {
        panic!("Passwords shouldn't match!");
    }
}

#[test]
fn test_check_password_wrong_pepper() {
    let pepper = test_pepper();
    let other_pepper = test_pepper();
    let pw = set_password("contraseña", &pepper, Duration::from_millis(0)).unwrap();
    assert!(check_password("contraseña", pw, &other_pepper).is_err());
}

#[test]
fn test_same_password_gets_different_salts() {
    let pepper = test_pepper();
    let pw1 = set_password("password", &pepper, Duration::from_millis(0)).unwrap();
    let pw2 = set_password("password", &pepper, Duration::from_millis(0)).unwrap();
    assert_ne!(pw1.salt, pw2.salt);
    assert_ne!(pw1.hash, pw2.hash);
}

#[test]
fn test_password_length_limits() {
    let pepper = test_pepper();
    match set_password("short", &pepper, Duration::from_millis(0)) {
        Err(Error(ErrorKind::PasswordTooShort, _)) => (),
        other => panic!("Expected PasswordTooShort, got {:?}", other),
    }
    let long_pw: String = std::iter::repeat('x').take(MAX_PASSWORD_LEN + 1).collect();
    match set_password(&long_pw, &pepper, Duration::from_millis(0)) {
        Err(Error(ErrorKind::PasswordTooLong, _)) => (),
        other => panic!("Expected PasswordTooLong, got {:?}", other),
    }
}

#[test]
fn test_db_round_trip_keeps_password_checkable() {
    let pepper = test_pepper();
    let pw = set_password("miekkakala", &pepper, Duration::from_millis(0)).unwrap();
    let from_db: HashedPassword = pw.into_db(7).into();
    check_password("miekkakala", from_db, &pepper).expect("Passwords should match!");
}

#[test]
fn test_set_stretch_password1() {
    let pepper = test_pepper();

    let init_pw = set_password("daggerfish", &pepper, Duration::from_millis(0)).unwrap();
    let stretched_pw_0 = stretch_password(11, init_pw);
    let stretched_pw_1 = stretch_password(12, stretched_pw_0);
    let stretched_pw_2 = stretch_password(12, stretched_pw_1);

    assert_eq!(stretched_pw_1.hash, stretched_pw_2.hash);
    assert_eq!(stretched_pw_1.extra_rounds, stretched_pw_2.extra_rounds);
}

#[test]
fn test_set_stretch_password2() {
    let pepper = test_pepper();

    let init_pw_1 = set_password("swordfish", &pepper, Duration::from_millis(0)).unwrap();
    let init_pw_2 = stretch_password(10, init_pw_1);

    assert_eq!(init_pw_1.hash, init_pw_2.hash);
    assert_eq!(0, init_pw_2.extra_rounds);
}

#[test]
fn test_set_stretch_check_password() {
    let pepper = test_pepper();

    let init_pw = set_password("miekkakala", &pepper, Duration::from_millis(0)).unwrap();
    let stretched_pw = stretch_password(11, init_pw);

    check_password("miekkakala", stretched_pw, &pepper).expect("Passwords should match!");
    if let Ok(()) = check_password("tikarikala", stretched_pw, &pepper) {
        panic!("Passwords shouldn't match!");
    }
}
