//! Process-wide record: installed once, read from many threads.

use coffee_env::{current, get, init_from, ConfigError, EnvironmentConfig, LoadOptions, Profile};
use std::thread;

#[test]
fn concurrent_readers_see_one_record() {
    assert!(matches!(current(), Err(ConfigError::NotInitialized)));

    let options = LoadOptions {
        profile: Profile::Development,
        file: None,
        use_env: false,
    };
    let installed = init_from(&options).unwrap();
    let address = installed as *const EnvironmentConfig as usize;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                let env = get().unwrap();
                (env as *const EnvironmentConfig as usize, env.api_server_url.clone())
            })
        })
        .collect();

    for handle in handles {
        let (seen, url) = handle.join().unwrap();
        assert_eq!(seen, address);
        assert_eq!(url, "http://127.0.0.1:5000");
    }

    assert!(matches!(init_from(&options), Err(ConfigError::AlreadyInitialized)));
}
