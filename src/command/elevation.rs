//! Wrapping a command line for administrator elevation.

use crate::config::ElevationMethod;

/// Rewrites `args` so it runs through the given elevation front-end.
///
/// Returns `None` when no front-end is configured.
pub fn wrap(method: ElevationMethod, args: &[String]) -> Option<Vec<String>> {
    if args.is_empty() {
        return None;
    }

    match method {
        ElevationMethod::Osascript => {
            let script = format!(
                "do shell script \"{}\" with administrator privileges",
                applescript_escape(&shell_join(args))
            );
            Some(vec!["osascript".to_string(), "-e".to_string(), script])
        }
        ElevationMethod::Sudo => {
            // -n: fail instead of prompting on a terminal nobody is watching
            let mut argv = vec!["sudo".to_string(), "-n".to_string()];
            argv.extend(args.iter().cloned());
            Some(argv)
        }
        ElevationMethod::Pkexec => {
            let mut argv = vec!["pkexec".to_string()];
            argv.extend(args.iter().cloned());
            Some(argv)
        }
        ElevationMethod::None => None,
    }
}

/// Joins arguments into one POSIX shell command line.
pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|a| shell_quote(a))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::argv;

    #[test]
    fn test_shell_join_quotes_only_when_needed() {
        let args = argv(&["diskutil", "mount", "disk2s1"]);
        assert_eq!(shell_join(&args), "diskutil mount disk2s1");

        let args = argv(&["diskutil", "unmount", "/Volumes/NO NAME"]);
        assert_eq!(shell_join(&args), "diskutil unmount '/Volumes/NO NAME'");

        let args = argv(&["echo", "it's"]);
        assert_eq!(shell_join(&args), "echo 'it'\\''s'");
    }

    #[test]
    fn test_osascript_wrapping() {
        let wrapped = wrap(
            ElevationMethod::Osascript,
            &argv(&["sh", "-c", "mkdir -p \"$1\"", "disk2s1"]),
        )
        .unwrap();

        assert_eq!(wrapped[0], "osascript");
        assert_eq!(wrapped[1], "-e");
        assert!(wrapped[2].starts_with("do shell script \"sh -c 'mkdir -p \\\"$1\\\"' disk2s1\""));
        assert!(wrapped[2].ends_with("with administrator privileges"));
    }

    #[test]
    fn test_sudo_is_non_interactive() {
        let wrapped = wrap(ElevationMethod::Sudo, &argv(&["diskutil", "mount", "disk2s1"])).unwrap();
        assert_eq!(wrapped, argv(&["sudo", "-n", "diskutil", "mount", "disk2s1"]));
    }

    #[test]
    fn test_no_front_end() {
        assert!(wrap(ElevationMethod::None, &argv(&["diskutil"])).is_none());
        assert!(wrap(ElevationMethod::Sudo, &[]).is_none());
    }
}
