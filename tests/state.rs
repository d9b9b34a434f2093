//! The state-envelope invariant (spec §4.5, §7a): magic/version header, normalized parameter
//! payload, author extension, and the version-too-new error path, driven through the public API.

use zplugin::params::declaration::{ParamDecl, ParamFlags};
use zplugin::params::range::FloatRange;
use zplugin::params::smoothing::SmoothingStyle;
use zplugin::params::ParamRuntime;
use zplugin::state::{load, save, StateError, StateReader, StateWriter};

static DECLS: &[ParamDecl] = &[
    ParamDecl::Continuous {
        name: "Gain",
        id: "gain",
        default: 0.0,
        range: FloatRange::Linear { min: -30.0, max: 30.0 },
        unit: Some(" dB"),
        smoothing: SmoothingStyle::None,
        flags: ParamFlags::AUTOMATABLE,
    },
    ParamDecl::Boolean { name: "Bypass", id: "bypass", default: false, flags: ParamFlags::AUTOMATABLE },
];

#[derive(Default)]
struct MemoryStream {
    buf: Vec<u8>,
    pos: usize,
}

impl StateWriter for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> usize {
        self.buf.extend_from_slice(buf);
        buf.len()
    }
}

impl StateReader for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let available = &self.buf[self.pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        n
    }
}

#[test]
fn saved_state_round_trips_through_a_fresh_runtime_and_an_author_extension() {
    let saved_extension = b"preset-name".to_vec();

    let store = ParamRuntime::new(DECLS);
    store.set_normalized(0, 0.75, 44_100.0);
    store.set_normalized(1, 1.0, 44_100.0);

    let mut stream = MemoryStream::default();
    save(&mut stream, 3, &store, |writer| {
        writer.write(&saved_extension) == saved_extension.len()
    })
    .expect("save into an in-memory stream cannot fail");

    let fresh = ParamRuntime::new(DECLS);
    stream.pos = 0;
    let mut loaded_extension = vec![0u8; saved_extension.len()];
    let version = load(&mut stream, 3, true, &fresh, |reader, _version| {
        reader.read(&mut loaded_extension) == loaded_extension.len()
    })
    .expect("a well-formed stream must load");

    assert_eq!(version, 3);
    assert_eq!(fresh.normalized(0), 0.75);
    assert!(fresh.get_bool(1));
    assert_eq!(loaded_extension, saved_extension);
}

#[test]
fn loading_a_freshly_saved_preset_does_not_ramp_in() {
    // A freshly loaded value must be immediately current, not mid-smoother-transition.
    let store = ParamRuntime::new(DECLS);
    store.set_normalized(0, 1.0, 44_100.0);

    let mut stream = MemoryStream::default();
    save(&mut stream, 1, &store, |_| true).unwrap();

    let fresh = ParamRuntime::new(DECLS);
    stream.pos = 0;
    load(&mut stream, 1, true, &fresh, |_, _| true).unwrap();

    assert_eq!(fresh.get_float(0), 30.0, "load_normalized must snap rather than schedule smoothing");
}

#[test]
fn a_version_newer_than_the_build_supports_is_rejected_in_strict_mode() {
    let store = ParamRuntime::new(DECLS);
    let mut stream = MemoryStream::default();
    save(&mut stream, 7, &store, |_| true).unwrap();

    stream.pos = 0;
    let err = load(&mut stream, 2, true, &store, |_, _| true).unwrap_err();
    assert_eq!(err, StateError::VersionTooNew { found: 7, max_supported: 2 });
}

#[test]
fn an_empty_stream_is_reported_as_truncated_not_a_panic() {
    let store = ParamRuntime::new(DECLS);
    let mut stream = MemoryStream::default();
    let err = load(&mut stream, 1, true, &store, |_, _| true).unwrap_err();
    assert_eq!(err, StateError::TruncatedStream);
}
