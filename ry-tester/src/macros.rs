//! Assertion macros for registry case bodies
//!
//! Each macro returns early with an `anyhow` error carrying a literal
//! description of the failed expectation, so case bodies are plain
//! `fn() -> anyhow::Result<()>`.

#[macro_export]
macro_rules! ry_expect_true {
    ($cond:expr) => {
        if !($cond) {
            $crate::anyhow::bail!("Expected true: {}", stringify!($cond));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_false {
    ($cond:expr) => {
        if $cond {
            $crate::anyhow::bail!("Expected false: {}", stringify!($cond));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_eq {
    ($expected:expr, $actual:expr) => {
        if ($expected) != ($actual) {
            $crate::anyhow::bail!("Expected {} == {}", stringify!($expected), stringify!($actual));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_ne {
    ($expected:expr, $actual:expr) => {
        if ($expected) == ($actual) {
            $crate::anyhow::bail!("Expected {} != {}", stringify!($expected), stringify!($actual));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_gt {
    ($a:expr, $b:expr) => {
        if !(($a) > ($b)) {
            $crate::anyhow::bail!("Expected {} > {}", stringify!($a), stringify!($b));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_ge {
    ($a:expr, $b:expr) => {
        if !(($a) >= ($b)) {
            $crate::anyhow::bail!("Expected {} >= {}", stringify!($a), stringify!($b));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_lt {
    ($a:expr, $b:expr) => {
        if !(($a) < ($b)) {
            $crate::anyhow::bail!("Expected {} < {}", stringify!($a), stringify!($b));
        }
    };
}

#[macro_export]
macro_rules! ry_expect_le {
    ($a:expr, $b:expr) => {
        if !(($a) <= ($b)) {
            $crate::anyhow::bail!("Expected {} <= {}", stringify!($a), stringify!($b));
        }
    };
}

/// The expression must evaluate to `Err(_)`
#[macro_export]
macro_rules! ry_expect_err {
    ($result:expr) => {
        if ($result).is_ok() {
            $crate::anyhow::bail!("Expected {} to fail", stringify!($result));
        }
    };
}

/// The statement must panic
#[macro_export]
macro_rules! ry_expect_panic {
    ($stmt:expr) => {
        if $crate::fault::catch(|| {
            let _ = $stmt;
        })
        .is_ok()
        {
            $crate::anyhow::bail!("Expected {} to panic", stringify!($stmt));
        }
    };
}

#[cfg(test)]
mod tests {
    fn check_true(value: bool) -> anyhow::Result<()> {
        ry_expect_true!(value);
        Ok(())
    }

    fn check_order(a: i32, b: i32) -> anyhow::Result<()> {
        ry_expect_lt!(a, b);
        ry_expect_le!(a, b);
        ry_expect_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_passing_expectations() -> anyhow::Result<()> {
        ry_expect_true!(1 + 1 == 2);
        ry_expect_false!(2 < 1);
        ry_expect_eq!(4, 2 * 2);
        ry_expect_gt!(3, 2);
        ry_expect_ge!(3, 3);
        ry_expect_err!("x".parse::<i32>());
        ry_expect_panic!(Vec::<i32>::new()[0]);
        check_order(1, 2)
    }

    #[test]
    fn test_failure_message_is_literal() {
        let err = check_true(false).unwrap_err();
        assert_eq!(err.to_string(), "Expected true: value");

        let err = check_order(2, 1).unwrap_err();
        assert_eq!(err.to_string(), "Expected a < b");
    }

    #[test]
    fn test_expect_eq_message() {
        fn check() -> anyhow::Result<()> {
            let answer = 41;
            ry_expect_eq!(42, answer);
            Ok(())
        }
        assert_eq!(check().unwrap_err().to_string(), "Expected 42 == answer");
    }

    #[test]
    fn test_expect_err_on_ok() {
        fn check() -> anyhow::Result<()> {
            ry_expect_err!("7".parse::<i32>());
            Ok(())
        }
        let message = check().unwrap_err().to_string();
        assert!(message.starts_with("Expected "));
        assert!(message.ends_with(" to fail"));
    }
}
