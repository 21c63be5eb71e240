use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use cp2k_deepmd::io::{self, Format, Precision};
use cp2k_deepmd::{
    AssembleConfig, Chunking, DatasetError, PersistOptions, PrecisionPolicy, Shuffle,
    SourceGroup, SplitConfig, StepSchedule, convert, read_dataset, split_dataset, subset_dir,
};

/// Writes the four CP2K logs of one segment with a print stride of 1.
struct Segment<'a> {
    stem: &'a str,
    first_step: i64,
    nsteps: i64,
    atoms: &'a [(u32, &'a str)],
    /// Logs also hold the frame of `first_step` itself.
    initial: bool,
}

impl Segment<'_> {
    fn logged_steps(&self) -> std::ops::RangeInclusive<i64> {
        let start = if self.initial {
            self.first_step
        } else {
            self.first_step + 1
        };
        start..=self.first_step + self.nsteps
    }

    fn write(&self, dir: &Path) -> SourceGroup {
        let stem = dir.join(self.stem);
        let path = |suffix: &str| {
            let mut p = stem.as_os_str().to_owned();
            p.push(suffix);
            PathBuf::from(p)
        };

        let mut cell = String::from(
            "#   Step   Time [fs]       Ax [Angstrom]       Ay [Angstrom]       Az [Angstrom]       Bx [Angstrom]       By [Angstrom]       Bz [Angstrom]       Cx [Angstrom]       Cy [Angstrom]       Cz [Angstrom]      Volume [Angstrom^3]\n",
        );
        let mut energy = String::from(
            "#     Step Nr.          Time[fs]        Kin.[a.u.]          Temp[K]            Pot.[a.u.]        Cons Qty[a.u.]        UsedTime[s]\n",
        );
        let mut xyz = String::new();
        for step in self.logged_steps() {
            let t = step as f64 * 0.5;
            let l = 12.0 + step as f64 * 1e-3;
            writeln!(
                cell,
                "{step:>8} {t:>12.3} {l:>20.10} 0.0 0.0 0.0 {l:>20.10} 0.0 0.0 0.0 {l:>20.10} {:>20.10}",
                l * l * l
            )
            .unwrap();
            writeln!(
                energy,
                "{step:>10} {t:>20.6} {:>20.9} {:>20.9} {:>20.9} {:>20.9} {:>20.9}",
                0.01,
                300.0,
                -17.2,
                cons_qty(step),
                1.5
            )
            .unwrap();

            writeln!(xyz, "{:>8}", self.atoms.len()).unwrap();
            writeln!(
                xyz,
                " i = {step:>8}, time = {t:>12.3}, E = {:>20.10}",
                -17.2
            )
            .unwrap();
            for (a, (_, element)) in self.atoms.iter().enumerate() {
                let [x, y, z] = coord(step, a);
                writeln!(xyz, "  {element:<2} {x:>20.10} {y:>20.10} {z:>20.10}").unwrap();
            }
        }

        let mut forces = String::new();
        let first_force = *self.logged_steps().start() - 1;
        for step in first_force..=self.first_step + self.nsteps {
            writeln!(forces, " ATOMIC FORCES in [a.u.]\n").unwrap();
            writeln!(
                forces,
                " # Atom   Kind   Element          X              Y              Z"
            )
            .unwrap();
            for (a, (kind, element)) in self.atoms.iter().enumerate() {
                let [x, y, z] = force(step, a);
                writeln!(
                    forces,
                    "  {:>6} {kind:>6} {element:>6} {x:>14.8} {y:>14.8} {z:>14.8}",
                    a + 1
                )
                .unwrap();
            }
            writeln!(forces, " SUM OF ATOMIC FORCES    0.0 0.0 0.0   0.0\n").unwrap();
        }

        fs::write(path("-Cell.cell"), cell).unwrap();
        fs::write(path("-Energy.en"), energy).unwrap();
        fs::write(path("-Trajectory.xyz"), xyz).unwrap();
        fs::write(path("-Forces.for"), forces).unwrap();

        SourceGroup::new(stem, self.nsteps as usize)
    }
}

fn cons_qty(step: i64) -> f64 {
    -17.0 - step as f64 * 0.125
}

fn coord(step: i64, atom: usize) -> [f64; 3] {
    let base = atom as f64 + step as f64 * 0.0625;
    [base, base + 0.25, base + 0.5]
}

fn force(step: i64, atom: usize) -> [f64; 3] {
    let base = step as f64 + atom as f64 * 0.125;
    [base, -base, base * 0.5]
}

const WATER: [(u32, &str); 3] = [(1, "O"), (2, "H"), (2, "H")];
const HO: [(u32, &str); 2] = [(1, "H"), (2, "O")];

fn segment<'a>(stem: &'a str, first_step: i64, nsteps: i64, atoms: &'a [(u32, &'a str)]) -> Segment<'a> {
    Segment {
        stem,
        first_step,
        nsteps,
        atoms,
        initial: false,
    }
}

#[test]
fn h_o_forces_give_type_files_and_force_shape() {
    let dir = tempfile::tempdir().unwrap();
    let group = segment("HO", 0, 2, &HO).write(dir.path());

    let parsed = io::forces::read_file(&group.path(Format::Forces), &StepSchedule::new(2, 1, 0.5))
        .unwrap();
    assert_eq!(parsed.value.forces.shape(), (3, 6));
    assert_eq!(parsed.value.types.type_map(), vec!["H", "O"]);
    assert!(parsed.skipped.is_empty());

    let out = dir.path().join("dataset");
    convert(&[group], &AssembleConfig::default(), &out).unwrap();
    assert_eq!(fs::read_to_string(out.join("type_map.raw")).unwrap(), "H\nO\n");
    assert_eq!(fs::read_to_string(out.join("type.raw")).unwrap(), "0\n1\n");
}

#[test]
fn segments_concatenate_to_declared_steps() {
    let dir = tempfile::tempdir().unwrap();
    let groups = vec![
        segment("WAT-0-10", 0, 10, &WATER).write(dir.path()),
        segment("WAT-10-15", 10, 5, &WATER).write(dir.path()),
    ];
    let out = dir.path().join("water");

    let (assembled, subsets) = convert(&groups, &AssembleConfig::default(), &out).unwrap();
    let d = &assembled.dataset;
    assert_eq!(d.nsteps(), 15);
    assert_eq!(d.cell.shape(), (15, 9));
    assert_eq!(d.coord.shape(), (15, 9));
    assert_eq!(d.force.shape(), (15, 9));
    assert_eq!(subsets.len(), 1);
    assert_eq!(subsets[0].dir, subset_dir(&out, 0, 3));

    // step 0 and step 10 forces belong to configurations that are not kept
    assert_eq!(d.force.row(0).unwrap()[..3], force(1, 0));
    assert_eq!(d.force.row(10).unwrap()[..3], force(11, 0));
    assert_eq!(d.force.row(14).unwrap()[6..9], force(15, 2));
    assert_eq!(d.coord.row(10).unwrap()[3..6], coord(11, 1));
    assert_eq!(d.energy[10], cons_qty(11));
    assert_eq!(d.cell.row(0).unwrap()[0], 12.001);

    let loaded = read_dataset(&out).unwrap();
    assert_eq!(loaded.precision, Precision::Double);
    assert_eq!(&loaded.dataset, d);
    assert_eq!(
        fs::read_to_string(out.join("type.raw")).unwrap(),
        "0\n1\n1\n"
    );
}

#[test]
fn rerunning_conversion_rewrites_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let groups = vec![segment("RUN", 0, 4, &WATER).write(dir.path())];
    let out = dir.path().join("out");

    let snapshot = |root: &Path| -> Vec<(PathBuf, Vec<u8>)> {
        let mut files = Vec::new();
        for name in ["type.raw", "type_map.raw"] {
            files.push((root.join(name), fs::read(root.join(name)).unwrap()));
        }
        for entry in fs::read_dir(subset_dir(root, 0, 3)).unwrap() {
            let path = entry.unwrap().path();
            files.push((path.clone(), fs::read(&path).unwrap()));
        }
        files.sort();
        files
    };

    convert(&groups, &AssembleConfig::default(), &out).unwrap();
    let first = snapshot(&out);
    convert(&groups, &AssembleConfig::default(), &out).unwrap();
    assert_eq!(snapshot(&out), first);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 3);
}

#[test]
fn chunked_output_is_float32_while_single_output_keeps_float64() {
    let dir = tempfile::tempdir().unwrap();
    let groups = vec![segment("RUN", 0, 10, &HO).write(dir.path())];

    let chunked = AssembleConfig {
        persist: PersistOptions {
            chunking: Chunking::Split(4),
            precision: PrecisionPolicy::Auto,
        },
        ..AssembleConfig::default()
    };
    let (_, subsets) = convert(&groups, &chunked, &dir.path().join("chunked")).unwrap();
    assert_eq!(subsets.len(), 4);
    assert!(subsets.iter().all(|s| s.rows == 2 && s.precision == Precision::Single));

    let (_, single) = convert(&groups, &AssembleConfig::default(), &dir.path().join("single")).unwrap();
    assert_eq!(single[0].precision, Precision::Double);

    // the two leftover steps of the 10 / 4 division are not written
    let loaded = read_dataset(&dir.path().join("chunked")).unwrap();
    assert_eq!(loaded.subsets, 4);
    assert_eq!(loaded.dataset.nsteps(), 8);
    assert_eq!(loaded.precision, Precision::Single);
}

#[test]
fn zero_based_logs_keep_the_initial_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let group = Segment {
        initial: true,
        ..segment("NVT", 0, 4, &HO)
    }
    .write(dir.path());

    let config = AssembleConfig {
        zero_based: true,
        ..AssembleConfig::default()
    };
    let (assembled, _) = convert(&[group.clone()], &config, &dir.path().join("out")).unwrap();
    assert_eq!(assembled.dataset.nsteps(), 5);
    assert_eq!(assembled.dataset.energy[0], cons_qty(0));
    assert_eq!(assembled.dataset.force.row(0).unwrap()[..3], force(0, 0));

    // without the flag the extra frames are a frame-count error
    let err = convert(&[group], &AssembleConfig::default(), &dir.path().join("bad")).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Io(io::Error::ShapeMismatch {
            format: Format::Trajectory,
            ..
        })
    ));
}

#[test]
fn declared_steps_must_match_trajectory_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut group = segment("RUN", 0, 10, &WATER).write(dir.path());
    group.nsteps = 12;

    let err = convert(&[group], &AssembleConfig::default(), &dir.path().join("out")).unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Io(io::Error::ShapeMismatch {
            format: Format::Trajectory,
            ..
        })
    ));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_log_is_reported_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let group = segment("RUN", 0, 3, &WATER).write(dir.path());
    fs::remove_file(group.path(Format::Forces)).unwrap();

    match convert(&[group], &AssembleConfig::default(), &dir.path().join("out")) {
        Err(DatasetError::MissingPath { path, .. }) => {
            assert!(path.ends_with("RUN-Forces.for"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn segments_with_different_atoms_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let groups = vec![
        segment("A", 0, 2, &WATER).write(dir.path()),
        segment("B", 2, 2, &HO).write(dir.path()),
    ];
    assert!(matches!(
        convert(&groups, &AssembleConfig::default(), &dir.path().join("out")),
        Err(DatasetError::TypeMismatch { group: 1 })
    ));
}

#[test]
fn converted_dataset_splits_into_train_and_test() {
    let dir = tempfile::tempdir().unwrap();
    let groups = vec![segment("RUN", 0, 10, &WATER).write(dir.path())];
    let root = dir.path().join("water");
    let (assembled, _) = convert(&groups, &AssembleConfig::default(), &root).unwrap();

    let config = SplitConfig {
        shuffle: Shuffle::Seeded(42),
        test: PersistOptions {
            chunking: Chunking::Split(2),
            precision: PrecisionPolicy::Fixed(Precision::Double),
        },
        ..SplitConfig::default()
    };
    let outcome = split_dataset(&root, &config).unwrap();
    assert_eq!((outcome.train_rows, outcome.test_rows), (8, 2));
    assert!(outcome.missing_side_files.is_empty());
    assert_eq!(outcome.test.len(), 2);

    for side in ["train", "test"] {
        assert_eq!(
            fs::read_to_string(root.join(side).join("type_map.raw")).unwrap(),
            "O\nH\n"
        );
    }

    let train = read_dataset(&root.join("train")).unwrap().dataset;
    let test = read_dataset(&root.join("test")).unwrap().dataset;

    let mut energies: Vec<f64> = train.energy.iter().chain(&test.energy).copied().collect();
    energies.sort_by(f64::total_cmp);
    let mut expected = assembled.dataset.energy.clone();
    expected.sort_by(f64::total_cmp);
    assert_eq!(energies, expected);

    // rows stay joined across quantities after shuffling
    for row in 0..train.nsteps() {
        let e = train.energy[row];
        let src = assembled
            .dataset
            .energy
            .iter()
            .position(|&v| v == e)
            .unwrap();
        assert_eq!(train.force.row(row), assembled.dataset.force.row(src));
    }

    // same seed, same split
    let again = split_dataset(&root, &config).unwrap();
    assert_eq!(again.train_rows, 8);
    assert_eq!(read_dataset(&root.join("train")).unwrap().dataset, train);
}
