//! Tests for chunked, resumable layout generation

#[cfg(test)]
mod tests {
    use roomstamp::algorithm::job::{JobPhase, JobStatus};
    use roomstamp::algorithm::layout::{GenerationState, LayoutConfig, LayoutGenerator};

    fn config() -> LayoutConfig {
        let mut config = LayoutConfig::default();
        config.set_size(48, 32).set_room_count(6).set_rows_per_yield(8);
        config
    }

    // Tests chunked and synchronous runs produce the same layout
    // Verified by reseeding the chunked job per chunk
    #[test]
    fn test_chunked_matches_synchronous() {
        let mut sync = LayoutGenerator::new(config());
        let sync_report = sync.generate(17);

        let mut chunked = LayoutGenerator::new(config());
        let mut job = chunked.start_job(17).expect("idle generator accepts a job");

        let mut yields = 0;
        let chunked_report = loop {
            match job.resume(&mut chunked, &mut ()) {
                JobStatus::Pending(_) => yields += 1,
                JobStatus::Done(report) => break Some(report),
                JobStatus::Cancelled => break None,
            }
        };

        assert!(yields > 4, "only {yields} yields");
        assert_eq!(sync_report.ok(), chunked_report);
        assert_eq!(sync.grid().cells, chunked.grid().cells);
        assert_eq!(sync.rooms(), chunked.rooms());
        assert_eq!(sync.centers(), chunked.centers());
    }

    // Tests grid reset yields every rows_per_yield rows
    // Verified by resetting the whole grid in one chunk
    #[test]
    fn test_reset_yields_per_row_chunk() {
        let mut generator = LayoutGenerator::new(config());
        let mut job = generator.start_job(3).expect("idle generator accepts a job");

        assert_eq!(job.phase(), JobPhase::ResetGrid { next_row: 0 });
        let mut next_rows = Vec::new();
        for _ in 0..4 {
            if let JobStatus::Pending(JobPhase::ResetGrid { next_row }) =
                job.resume(&mut generator, &mut ())
            {
                next_rows.push(next_row);
            }
        }
        assert_eq!(next_rows, vec![8, 16, 24]);
        assert_eq!(job.phase(), JobPhase::PlaceRooms { attempts: 0 });
        assert_eq!(job.attempt_seed(), 3);
    }

    // Tests room placement yields every room_count / 2 attempts
    #[test]
    fn test_room_placement_chunks() {
        let mut generator = LayoutGenerator::new(config());
        let mut job = generator.start_job(8).expect("idle generator accepts a job");

        while matches!(job.phase(), JobPhase::ResetGrid { .. }) {
            job.resume(&mut generator, &mut ());
        }
        let status = job.resume(&mut generator, &mut ());
        let progressed = matches!(
            status,
            JobStatus::Pending(JobPhase::PlaceRooms { attempts: 3 } | JobPhase::ConnectRooms)
        );
        assert!(progressed, "unexpected status {status:?}");
        assert!(generator.rooms().len() <= 3);
    }

    // Tests a cancelled job stops without touching the generator
    // Verified by skipping the lease comparison on resume
    #[test]
    fn test_cancelled_job_reports_cancelled() {
        let mut generator = LayoutGenerator::new(config());
        let mut job = generator.start_job(4).expect("idle generator accepts a job");
        job.resume(&mut generator, &mut ());
        generator.cancel();

        assert_eq!(job.resume(&mut generator, &mut ()), JobStatus::Cancelled);
        assert_eq!(job.phase(), JobPhase::Finished);

        let fresh = generator.start_job(4);
        assert!(fresh.is_ok());
        assert_eq!(job.resume(&mut generator, &mut ()), JobStatus::Cancelled);
    }

    // Tests a job cannot drive a different generator instance
    #[test]
    fn test_job_rejects_foreign_generator() {
        let mut owner = LayoutGenerator::new(config());
        let mut other = LayoutGenerator::new(config());
        let mut job = owner.start_job(4).expect("idle generator accepts a job");
        assert_eq!(job.resume(&mut other, &mut ()), JobStatus::Cancelled);
    }

    // Tests jobs on two busy generators stay bound to their own instance
    // Verified by matching jobs to generators by a counter every instance starts at zero
    #[test]
    fn test_job_rejects_busy_foreign_generator() {
        let mut owner = LayoutGenerator::new(config());
        let mut other = LayoutGenerator::new(config());
        let mut owned = owner.start_job(1).expect("idle generator accepts a job");
        let mut foreign = other.start_job(2).expect("idle generator accepts a job");

        assert_eq!(owned.resume(&mut other, &mut ()), JobStatus::Cancelled);
        assert_eq!(owned.phase(), JobPhase::Finished);
        assert_eq!(
            other.grid().cells,
            LayoutGenerator::new(config()).grid().cells
        );
        assert!(matches!(
            foreign.resume(&mut other, &mut ()),
            JobStatus::Pending(JobPhase::ResetGrid { next_row: 8 })
        ));
        assert!(other.is_generating());
        assert!(!owner.is_generating());
    }

    // Tests dropping an unfinished job frees its generator
    // Verified by clearing the busy flag only when a job concludes
    #[test]
    fn test_dropped_job_releases_generator() {
        let mut generator = LayoutGenerator::new(config());
        {
            let mut job = generator.start_job(1).expect("idle generator accepts a job");
            job.resume(&mut generator, &mut ());
            assert!(generator.is_generating());
        }
        assert!(!generator.is_generating());
        assert_eq!(generator.state(), GenerationState::Idle);

        let report = generator.generate(1).expect("released generator runs again");
        assert_eq!(report.seed, 1);
        assert!(!generator.is_generating());
    }

    // Tests a finished job holds no claim on its generator
    #[test]
    fn test_finished_job_cannot_resume() {
        let mut generator = LayoutGenerator::new(config());
        let mut job = generator.start_job(6).expect("idle generator accepts a job");
        while let JobStatus::Pending(_) = job.resume(&mut generator, &mut ()) {}

        assert!(!generator.is_generating());
        let mut next = generator.start_job(7).expect("concluded job frees the generator");
        assert_eq!(job.resume(&mut generator, &mut ()), JobStatus::Cancelled);
        assert!(matches!(
            next.resume(&mut generator, &mut ()),
            JobStatus::Pending(_)
        ));
    }
}
