mod test_remote_track_attached;
mod test_stale_generation_ignored;
mod test_viewer_answers_offer;
