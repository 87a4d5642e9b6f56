mod local_artifact_store_test;
