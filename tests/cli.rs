use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clap::{Arg, ArgAction, Command};
use cliwork::{
    CliError, CommandContext, CommandRef, HookError, Placement, Plugins, Supervisor, SupervisorConfig,
    WorkError, WorkFn,
};
use tokio_util::sync::CancellationToken;

fn context(root: &Command, args: &[&str]) -> CommandContext {
    let matches = root.clone().get_matches_from(args);
    CommandContext::from_command(root, matches)
}

#[test]
fn add_flags_runs_each_setup_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut plugins = Plugins::new();
    for name in ["alpha", "beta", "gamma"] {
        let calls = Arc::clone(&calls);
        plugins.register_setup(name, Placement::None, move |cmd: Command| {
            calls.fetch_add(1, Ordering::SeqCst);
            cmd.arg(Arg::new(name).long(name).action(ArgAction::SetTrue))
        });
    }

    let root = plugins.add_flags(Command::new("foo")).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let ids: Vec<&str> = root.get_arguments().map(|a| a.get_id().as_str()).collect();
    for name in ["alpha", "beta", "gamma"] {
        assert!(ids.contains(&name), "missing --{name} in {ids:?}");
    }

    let ctx = context(&root, &["foo", "--beta"]);
    assert!(ctx.flag("beta"));
    assert!(!ctx.flag("alpha"));
    assert!(!ctx.flag("no-such-flag"));
}

#[test]
fn setup_order_follows_placements() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut plugins = Plugins::new();
    let specs = [
        ("middle", ""),
        ("tail", ">"),
        ("head", "<"),
        ("before-middle", "<middle"),
        ("after-middle", ">middle"),
    ];
    for (name, placement) in specs {
        let seen = Arc::clone(&seen);
        plugins.register_setup(name, placement.parse().unwrap(), move |cmd: Command| {
            seen.lock().unwrap().push(name);
            cmd
        });
    }

    plugins.add_flags(Command::new("foo")).unwrap();
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.first(), Some(&"head"));
    assert_eq!(seen.last(), Some(&"tail"));

    let pos = |n: &str| seen.iter().position(|s| *s == n).unwrap();
    assert!(pos("before-middle") < pos("middle"));
    assert!(pos("middle") < pos("after-middle"));
}

fn record(
    name: &'static str,
    ran: &Arc<Mutex<Vec<&'static str>>>,
) -> impl Fn(&mut CommandContext) -> Result<(), HookError> + Send + Sync + 'static {
    let ran = Arc::clone(ran);
    move |_ctx: &mut CommandContext| {
        ran.lock().unwrap().push(name);
        Ok(())
    }
}

#[test]
fn before_command_stops_at_first_error() {
    let ran = Arc::new(Mutex::new(Vec::new()));
    let mut plugins = Plugins::new();

    plugins
        .register_before("a", Placement::None, record("a", &ran))
        .register_before("b", Placement::None, |_ctx: &mut CommandContext| {
            Err("fooerror".into())
        })
        .register_before("c", Placement::None, record("c", &ran));

    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let mut ctx = context(&root, &["foo"]);
    let err = plugins.before_command(&mut ctx).unwrap_err();

    match &err {
        CliError::Hook { plugin, source } => {
            assert_eq!(plugin, "b");
            assert_eq!(source.to_string(), "fooerror");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.as_label(), "cli_hook_failed");
    assert_eq!(*ran.lock().unwrap(), vec!["a"]);
}

#[test]
fn hooks_can_adjust_the_context() {
    let mut plugins = Plugins::new();
    plugins.register_before("quiet", Placement::None, |ctx: &mut CommandContext| {
        ctx.log_settings_mut().default_level = Some(tracing::Level::WARN);
        Ok(())
    });

    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let mut ctx = context(&root, &["foo"]);
    plugins.before_command(&mut ctx).unwrap();
    assert_eq!(ctx.log_settings().resolve(false), tracing::Level::WARN);
}

#[test]
fn placement_cycles_fail_add_flags() {
    let mut plugins = Plugins::new();
    plugins
        .register_setup("a", Placement::Before("b".into()), |cmd: Command| cmd)
        .register_setup("b", Placement::Before("a".into()), |cmd: Command| cmd);

    let err = plugins.add_flags(Command::new("foo")).unwrap_err();
    assert_eq!(err.as_label(), "cli_placement_cycle");
}

#[test]
fn invalid_placements_are_rejected() {
    for bad in ["<<", "x", "<a>b"] {
        let err = bad.parse::<Placement>().unwrap_err();
        assert_eq!(err.as_label(), "cli_placement_invalid", "{bad:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn do_all_runs_registered_work() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut plugins = Plugins::new();
    for name in ["one", "two"] {
        let runs = Arc::clone(&runs);
        plugins.register_work(WorkFn::arc(
            name,
            move |_ctx: CancellationToken, cmd: CommandRef| {
                let runs = Arc::clone(&runs);
                async move {
                    assert_eq!(cmd.display_name(), "foo");
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, WorkError>(())
                }
            },
        ));
    }
    assert_eq!(plugins.work().len(), 2);

    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let ctx = context(&root, &["foo"]).into_ref();
    let sup = Supervisor::new(SupervisorConfig::default());

    plugins
        .do_all(&sup, &CancellationToken::new(), ctx)
        .await
        .unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}
